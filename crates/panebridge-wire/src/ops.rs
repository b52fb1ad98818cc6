//! Operation names recognized on the panel channel.
//!
//! These are the exact `messageType` strings used on the wire; the panel side
//! of the bridge ships them verbatim, so they are not renamed here.

/// Enumerate files open in the editor.
pub const OPEN_FILES: &str = "getOpenFiles";

/// Session bootstrap request, sent by the panel once on startup.
pub const LOAD: &str = "onLoad";

/// Serialized model/telemetry configuration for the panel.
pub const BROWSER_CONFIG: &str = "config/getBrowserSerialized";

/// Streaming chat completion (multi-chunk reply).
pub const STREAM_CHAT: &str = "llm/streamChat";

/// Fixed `messageType` carried by every reply envelope.
///
/// The panel correlates replies by `messageId` alone; the reply marker reuses
/// the `onLoad` type for wire compatibility.
pub const REPLY: &str = "onLoad";
