//! Wire-level message model for the panebridge webview protocol.
//!
//! Every message crossing the panel boundary is an [`Envelope`]:
//! - A `messageType` naming the requested action (or the fixed reply marker)
//! - A `messageId` correlating replies to their request
//! - An operation-specific `data` payload
//!
//! Inbound payloads decode through the closed [`Request`] union; unknown
//! operation names and malformed payloads are explicit decode errors, never
//! silent coercions.

pub mod envelope;
pub mod error;
pub mod ops;
pub mod reply;
pub mod request;

pub use envelope::Envelope;
pub use error::{Result, WireError};
pub use ops::{BROWSER_CONFIG, LOAD, OPEN_FILES, REPLY, STREAM_CHAT};
pub use reply::{BrowserConfig, ChatChunk, ModelDescriptor, SessionInfo, StreamDone};
pub use request::{ChatMessage, ChatRequest, Request};
