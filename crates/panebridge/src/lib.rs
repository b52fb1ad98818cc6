//! Webview message bridge for an IDE AI coding assistant.
//!
//! panebridge multiplexes typed requests and asynchronous streaming replies
//! over the single untyped message channel between an extension host and its
//! chat webview panel, correlating replies to requests by identifier.
//!
//! # Crate Structure
//!
//! - [`wire`] — Envelope data model and typed operation payloads
//! - [`channel`] — The attachable duplex connection to the panel
//! - [`protocol`] — Correlation registry, dispatcher, and streaming chat

/// Re-export wire types.
pub mod wire {
    pub use panebridge_wire::*;
}

/// Re-export channel types.
pub mod channel {
    pub use panebridge_channel::*;
}

/// Re-export protocol types.
pub mod protocol {
    pub use panebridge_protocol::*;
}
