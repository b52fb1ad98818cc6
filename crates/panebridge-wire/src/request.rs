use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, WireError};
use crate::ops;

/// An inbound request, decoded from an envelope's operation name and payload.
///
/// This is the closed dispatch surface of the protocol: every recognized
/// operation is a variant here, and payloads are parsed up front so handlers
/// never see untyped data.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// `getOpenFiles` — enumerate files open in the editor.
    OpenFiles,
    /// `onLoad` — session bootstrap info for the panel.
    Load,
    /// `config/getBrowserSerialized` — model/telemetry configuration.
    BrowserConfig,
    /// `llm/streamChat` — streaming chat completion.
    StreamChat(ChatRequest),
}

impl Request {
    /// Parse an operation name and payload into a typed request.
    ///
    /// Unknown operation names and payloads of unrecognized shape are
    /// distinct errors; callers log and drop both without replying.
    pub fn parse(message_type: &str, data: &Value) -> Result<Self> {
        match message_type {
            ops::OPEN_FILES => Ok(Self::OpenFiles),
            ops::LOAD => Ok(Self::Load),
            ops::BROWSER_CONFIG => Ok(Self::BrowserConfig),
            ops::STREAM_CHAT => {
                let request = ChatRequest::parse(data)?;
                Ok(Self::StreamChat(request))
            }
            other => Err(WireError::UnknownOperation(other.to_string())),
        }
    }

    /// The wire operation name for this request.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::OpenFiles => ops::OPEN_FILES,
            Self::Load => ops::LOAD,
            Self::BrowserConfig => ops::BROWSER_CONFIG,
            Self::StreamChat(_) => ops::STREAM_CHAT,
        }
    }
}

/// Chat payload forwarded to the completion source.
///
/// Only the fields the bridge itself inspects are modeled; everything else is
/// carried through `extra` untouched, since the payload belongs to the
/// completion backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// Requested model title, when the panel overrides the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Conversation history, oldest first.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Backend-specific fields, passed through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatRequest {
    fn parse(data: &Value) -> Result<Self> {
        // A missing payload is a valid empty request; the panel sends
        // `data: undefined` for bare invocations.
        if data.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(data.clone()).map_err(|source| WireError::InvalidPayload {
            operation: ops::STREAM_CHAT,
            source,
        })
    }

    /// Build a single-message request from a user prompt.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.into(),
            }],
            ..Self::default()
        }
    }
}

/// One turn of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}
