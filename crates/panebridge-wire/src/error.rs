/// Errors that can occur while decoding inbound messages.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The operation name maps to no registered handler.
    #[error("unknown message type: {0}")]
    UnknownOperation(String),

    /// The payload does not match the operation's expected shape.
    #[error("invalid payload for {operation}: {source}")]
    InvalidPayload {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, WireError>;
