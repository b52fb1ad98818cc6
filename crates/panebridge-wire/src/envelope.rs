use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message crossing the panel boundary.
///
/// Wire format (JSON):
/// ```text
/// { "messageType": string, "messageId": string, "data": any }
/// ```
///
/// Request envelopes carry an operation-specific `messageType`; reply
/// envelopes carry the fixed [`crate::ops::REPLY`] marker and echo the
/// request's `messageId` verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    /// Operation name, or the reply marker.
    #[serde(rename = "messageType")]
    pub message_type: String,
    /// Correlation identifier, unique per outstanding exchange.
    #[serde(rename = "messageId")]
    pub message_id: String,
    /// Operation-specific payload, opaque at this layer.
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Create an envelope.
    pub fn new(
        message_type: impl Into<String>,
        message_id: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            message_type: message_type.into(),
            message_id: message_id.into(),
            data,
        }
    }

    /// Decode an inbound raw message.
    ///
    /// Returns `None` for malformed input: anything that is not a JSON object,
    /// or an object missing **both** `messageId` and `messageType`. An object
    /// carrying at least one of the two decodes, with the missing field
    /// defaulting to the empty string.
    pub fn decode(raw: &Value) -> Option<Self> {
        let obj = raw.as_object()?;
        let message_id = obj.get("messageId").and_then(Value::as_str);
        let message_type = obj.get("messageType").and_then(Value::as_str);

        if message_id.is_none() && message_type.is_none() {
            return None;
        }

        Some(Self {
            message_type: message_type.unwrap_or_default().to_string(),
            message_id: message_id.unwrap_or_default().to_string(),
            data: obj.get("data").cloned().unwrap_or(Value::Null),
        })
    }
}
