//! Request/reply correlation and handler dispatch for the panel channel.
//!
//! This is the protocol core. Inbound raw messages enter through
//! [`PanelProtocol::handle_message`], which decodes the envelope, settles any
//! pending outbound exchange with a matching identifier, and otherwise routes
//! the typed request to its handler. Handlers reply through a bound
//! [`Replier`] — zero, one, or many times for streaming.
//!
//! Failure containment: completion-source errors surface only as chat content
//! text; the dispatcher and channel never see handler errors.

pub mod chat;
pub mod config;
pub mod protocol;
pub mod registry;
pub mod scripted;

pub use chat::{ChunkStream, CompletionError, CompletionSource, MODEL_UNAVAILABLE};
pub use config::ProtocolConfig;
pub use protocol::{PanelProtocol, Replier};
pub use registry::PendingExchanges;
pub use scripted::ScriptedCompletion;
