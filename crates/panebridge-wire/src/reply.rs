use serde::{Deserialize, Serialize};

/// Session bootstrap descriptor, sent in reply to `onLoad`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub window_id: String,
    pub server_url: String,
    pub workspace_paths: Vec<String>,
    pub vsc_machine_id: String,
    pub vsc_media_url: String,
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self {
            window_id: "1".to_string(),
            server_url: String::new(),
            workspace_paths: Vec::new(),
            vsc_machine_id: "1111".to_string(),
            vsc_media_url: String::new(),
        }
    }
}

/// One configured chat model, as listed to the panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelDescriptor {
    /// Display name shown in the panel's model picker.
    pub title: String,
    /// Backend provider identifier.
    pub provider: String,
    /// Provider-specific model name.
    pub model: String,
}

/// Reply payload for `config/getBrowserSerialized`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrowserConfig {
    pub models: Vec<ModelDescriptor>,
    pub allow_anonymous_telemetry: bool,
}

impl BrowserConfig {
    /// Build the panel configuration from the configured model list.
    ///
    /// Telemetry is always off for this bridge.
    pub fn new(models: Vec<ModelDescriptor>) -> Self {
        Self {
            models,
            allow_anonymous_telemetry: false,
        }
    }
}

/// One streamed chunk of chat content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatChunk {
    pub content: String,
}

impl ChatChunk {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Terminal marker ending a streaming exchange. Sent exactly once per
/// `llm/streamChat` invocation, on every exit path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamDone {
    pub done: bool,
}

impl Default for StreamDone {
    fn default() -> Self {
        Self { done: true }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn session_info_uses_wire_field_names() {
        let value = serde_json::to_value(SessionInfo::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "windowId": "1",
                "serverUrl": "",
                "workspacePaths": [],
                "vscMachineId": "1111",
                "vscMediaUrl": "",
            })
        );
    }

    #[test]
    fn browser_config_disables_telemetry() {
        let config = BrowserConfig::new(vec![ModelDescriptor {
            title: "GPT-4".to_string(),
            provider: "openai".to_string(),
            model: "gpt-4".to_string(),
        }]);

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["allowAnonymousTelemetry"], json!(false));
        assert_eq!(value["models"][0]["title"], json!("GPT-4"));
    }

    #[test]
    fn stream_done_serializes_as_done_true() {
        let value = serde_json::to_value(StreamDone::default()).unwrap();
        assert_eq!(value, json!({ "done": true }));
    }

    #[test]
    fn chat_chunk_carries_content() {
        let value = serde_json::to_value(ChatChunk::new("He")).unwrap();
        assert_eq!(value, json!({ "content": "He" }));
    }
}
