use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{trace, warn};

use panebridge_channel::PanelChannel;
use panebridge_wire::{BrowserConfig, Envelope, Request, WireError};

use crate::chat::{run_stream_chat, CompletionSource};
use crate::config::ProtocolConfig;
use crate::registry::PendingExchanges;

/// Reply callback bound to one inbound envelope.
///
/// Every send echoes the inbound `messageId` under the fixed reply marker.
/// Sends are fire-and-forget: a detached panel drops them silently.
#[derive(Clone)]
pub struct Replier {
    channel: Arc<PanelChannel>,
    message_id: String,
}

impl Replier {
    /// Bind a replier to a message identifier.
    pub fn new(channel: Arc<PanelChannel>, message_id: String) -> Self {
        Self {
            channel,
            message_id,
        }
    }

    /// Send one reply envelope carrying `payload`.
    pub fn send<T: Serialize>(&self, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(data) => self.channel.reply(&self.message_id, data),
            // Our reply payloads serialize infallibly; anything else is a
            // caller bug worth surfacing in logs, not a protocol failure.
            Err(err) => warn!(message_id = %self.message_id, error = %err, "unserializable reply dropped"),
        }
    }

    /// The inbound identifier this replier echoes.
    pub fn message_id(&self) -> &str {
        &self.message_id
    }
}

impl std::fmt::Debug for Replier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Replier")
            .field("message_id", &self.message_id)
            .finish()
    }
}

/// The webview panel protocol: one instance per panel session.
///
/// Owns the pending-exchange table for outbound requests and the handler set
/// for inbound ones. Explicitly constructed and passed to whoever needs to
/// send or receive; lifecycle follows the owning session, not a global.
pub struct PanelProtocol {
    channel: Arc<PanelChannel>,
    pending: PendingExchanges,
    completions: Arc<dyn CompletionSource>,
    config: ProtocolConfig,
}

impl PanelProtocol {
    /// Create a protocol instance over `channel`, streaming chat through
    /// `completions`.
    pub fn new(
        channel: Arc<PanelChannel>,
        completions: Arc<dyn CompletionSource>,
        config: ProtocolConfig,
    ) -> Self {
        Self {
            channel,
            pending: PendingExchanges::new(),
            completions,
            config,
        }
    }

    /// The shared channel this protocol sends on.
    pub fn channel(&self) -> &Arc<PanelChannel> {
        &self.channel
    }

    /// Handle one inbound raw message from the panel.
    ///
    /// Malformed input (missing both identifier and operation) is dropped
    /// silently. An envelope matching a pending outbound exchange settles it.
    /// Everything else is parsed into a typed request and dispatched; unknown
    /// operations and malformed payloads are logged and dropped — no reply is
    /// ever sent for them.
    pub async fn handle_message(&self, raw: &Value) {
        let Some(envelope) = Envelope::decode(raw) else {
            trace!("dropping malformed message");
            return;
        };

        trace!(
            message_type = %envelope.message_type,
            message_id = %envelope.message_id,
            "received message"
        );

        if self.pending.resolve(&envelope.message_id, envelope.data.clone()) {
            return;
        }

        let replier = Replier::new(Arc::clone(&self.channel), envelope.message_id.clone());
        match Request::parse(&envelope.message_type, &envelope.data) {
            Ok(Request::OpenFiles) => replier.send(&json!([])),
            Ok(Request::Load) => replier.send(&self.config.session),
            Ok(Request::BrowserConfig) => {
                replier.send(&BrowserConfig::new(self.config.models.clone()));
            }
            Ok(Request::StreamChat(request)) => {
                run_stream_chat(self.completions.as_ref(), request, &replier).await;
            }
            Err(WireError::UnknownOperation(operation)) => {
                warn!(%operation, "unknown message type");
            }
            Err(err @ WireError::InvalidPayload { .. }) => {
                warn!(error = %err, "rejecting malformed payload");
            }
        }
    }

    /// Issue a request to the panel and await its single reply.
    ///
    /// Resolves to `None` immediately when no panel is attached (no exchange
    /// recorded). When a `request_timeout` is configured, it also resolves to
    /// `None` after the timeout elapses without a matching reply, pruning the
    /// pending entry. With no timeout, an unanswered request awaits forever.
    pub async fn request(&self, message_type: &str, data: Value) -> Option<Value> {
        if !self.channel.is_attached() {
            return None;
        }

        let message_id = self.channel.next_message_id();
        // Register before sending so a reply racing the send cannot be lost.
        let rx = self.pending.register(message_id.clone());
        self.channel.send(message_type, data, Some(message_id.clone()));

        match self.config.request_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, rx).await {
                Ok(Ok(reply)) => Some(reply),
                Ok(Err(_)) => None,
                Err(_) => {
                    self.pending.prune(&message_id);
                    None
                }
            },
            None => rx.await.ok(),
        }
    }

    /// Outstanding outbound exchanges (unanswered requests).
    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }
}

impl std::fmt::Debug for PanelProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelProtocol")
            .field("attached", &self.channel.is_attached())
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tokio::sync::mpsc::UnboundedReceiver;

    use panebridge_wire::{ops, ModelDescriptor};

    use super::*;
    use crate::scripted::ScriptedCompletion;

    fn protocol_with(
        completions: ScriptedCompletion,
        config: ProtocolConfig,
    ) -> (PanelProtocol, UnboundedReceiver<Envelope>) {
        let channel = Arc::new(PanelChannel::new());
        let rx = channel.attach();
        let protocol = PanelProtocol::new(channel, Arc::new(completions), config);
        (protocol, rx)
    }

    fn drain(rx: &mut UnboundedReceiver<Envelope>) -> Vec<Envelope> {
        let mut out = Vec::new();
        while let Ok(envelope) = rx.try_recv() {
            out.push(envelope);
        }
        out
    }

    #[tokio::test]
    async fn open_files_replies_once_with_empty_list() {
        let (protocol, mut rx) =
            protocol_with(ScriptedCompletion::unavailable(), ProtocolConfig::default());

        protocol
            .handle_message(&json!({ "messageType": "getOpenFiles", "messageId": "m1" }))
            .await;

        let replies = drain(&mut rx);
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].message_id, "m1");
        assert_eq!(replies[0].message_type, ops::REPLY);
        assert_eq!(replies[0].data, json!([]));
    }

    #[tokio::test]
    async fn load_replies_with_session_info() {
        let (protocol, mut rx) =
            protocol_with(ScriptedCompletion::unavailable(), ProtocolConfig::default());

        protocol
            .handle_message(&json!({ "messageType": "onLoad", "messageId": "m2" }))
            .await;

        let replies = drain(&mut rx);
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].data["windowId"], json!("1"));
        assert_eq!(replies[0].data["vscMachineId"], json!("1111"));
    }

    #[tokio::test]
    async fn browser_config_lists_models_without_telemetry() {
        let config = ProtocolConfig {
            models: vec![ModelDescriptor {
                title: "GPT-4".to_string(),
                provider: "openai".to_string(),
                model: "gpt-4".to_string(),
            }],
            ..ProtocolConfig::default()
        };
        let (protocol, mut rx) = protocol_with(ScriptedCompletion::unavailable(), config);

        protocol
            .handle_message(&json!({
                "messageType": "config/getBrowserSerialized",
                "messageId": "m3",
            }))
            .await;

        let replies = drain(&mut rx);
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].data["allowAnonymousTelemetry"], json!(false));
        assert_eq!(replies[0].data["models"][0]["title"], json!("GPT-4"));
    }

    #[tokio::test]
    async fn stream_chat_scenario_hello() {
        let (protocol, mut rx) = protocol_with(
            ScriptedCompletion::chunks(["He", "llo"]),
            ProtocolConfig::default(),
        );

        protocol
            .handle_message(&json!({
                "messageType": "llm/streamChat",
                "messageId": "m1",
                "data": { "messages": [{ "role": "user", "content": "hi" }] },
            }))
            .await;

        let replies = drain(&mut rx);
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0].data, json!({ "content": "He" }));
        assert_eq!(replies[1].data, json!({ "content": "llo" }));
        assert_eq!(replies[2].data, json!({ "done": true }));
        assert!(replies.iter().all(|envelope| envelope.message_id == "m1"));
    }

    #[tokio::test]
    async fn unknown_operation_never_replies() {
        let (protocol, mut rx) =
            protocol_with(ScriptedCompletion::unavailable(), ProtocolConfig::default());

        protocol
            .handle_message(&json!({ "messageType": "history/save", "messageId": "m4" }))
            .await;

        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn malformed_payload_never_replies() {
        let (protocol, mut rx) =
            protocol_with(ScriptedCompletion::unavailable(), ProtocolConfig::default());

        protocol
            .handle_message(&json!({
                "messageType": "llm/streamChat",
                "messageId": "m5",
                "data": 42,
            }))
            .await;

        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn malformed_envelope_is_dropped_idempotently() {
        let (protocol, mut rx) =
            protocol_with(ScriptedCompletion::unavailable(), ProtocolConfig::default());

        let malformed = json!({ "data": { "content": "orphan" } });
        protocol.handle_message(&malformed).await;
        protocol.handle_message(&malformed).await;

        assert!(drain(&mut rx).is_empty());
        assert_eq!(protocol.pending_requests(), 0);
    }

    #[tokio::test]
    async fn request_on_detached_channel_resolves_none_immediately() {
        let channel = Arc::new(PanelChannel::new());
        let protocol = PanelProtocol::new(
            channel,
            Arc::new(ScriptedCompletion::unavailable()),
            ProtocolConfig::default(),
        );

        let result = protocol.request("getTerminalContents", Value::Null).await;
        assert!(result.is_none());
        assert_eq!(protocol.pending_requests(), 0);
    }

    #[tokio::test]
    async fn request_resolves_with_matching_reply() {
        let (protocol, mut rx) =
            protocol_with(ScriptedCompletion::unavailable(), ProtocolConfig::default());

        let (result, ()) = tokio::join!(
            protocol.request("newSessionWithPrompt", json!({ "prompt": "hi" })),
            async {
                // The panel answers the envelope it received, echoing the id.
                let outbound = rx.recv().await.unwrap();
                assert_eq!(outbound.message_type, "newSessionWithPrompt");
                protocol
                    .handle_message(&json!({
                        "messageType": "onLoad",
                        "messageId": outbound.message_id,
                        "data": { "ok": true },
                    }))
                    .await;
            }
        );

        assert_eq!(result, Some(json!({ "ok": true })));
        assert_eq!(protocol.pending_requests(), 0);
    }

    #[tokio::test]
    async fn request_reply_is_not_redispatched_as_request() {
        let (protocol, mut rx) =
            protocol_with(ScriptedCompletion::unavailable(), ProtocolConfig::default());

        let (result, ()) = tokio::join!(
            protocol.request("getTerminalContents", Value::Null),
            async {
                let outbound = rx.recv().await.unwrap();
                // Reply envelopes reuse the `onLoad` marker; correlation must
                // win over dispatch or this would trigger the Load handler.
                protocol
                    .handle_message(&json!({
                        "messageType": "onLoad",
                        "messageId": outbound.message_id,
                        "data": "terminal text",
                    }))
                    .await;
            }
        );

        assert_eq!(result, Some(json!("terminal text")));
        // No extra reply envelope was produced by the Load handler.
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn unanswered_request_times_out_and_prunes() {
        let config = ProtocolConfig {
            request_timeout: Some(Duration::from_millis(20)),
            ..ProtocolConfig::default()
        };
        let (protocol, _rx) = protocol_with(ScriptedCompletion::unavailable(), config);

        let result = protocol.request("getTerminalContents", Value::Null).await;
        assert!(result.is_none());
        assert_eq!(protocol.pending_requests(), 0);
    }

    #[tokio::test]
    async fn concurrent_exchanges_correlate_by_identifier() {
        let (protocol, mut rx) =
            protocol_with(ScriptedCompletion::unavailable(), ProtocolConfig::default());

        let (first, second, ()) = tokio::join!(
            protocol.request("a", json!(1)),
            protocol.request("b", json!(2)),
            async {
                let first_out = rx.recv().await.unwrap();
                let second_out = rx.recv().await.unwrap();
                // Answer out of order; correlation is by id, not arrival.
                protocol
                    .handle_message(&json!({
                        "messageType": "onLoad",
                        "messageId": second_out.message_id,
                        "data": "reply-b",
                    }))
                    .await;
                protocol
                    .handle_message(&json!({
                        "messageType": "onLoad",
                        "messageId": first_out.message_id,
                        "data": "reply-a",
                    }))
                    .await;
            }
        );

        assert_eq!(first, Some(json!("reply-a")));
        assert_eq!(second, Some(json!("reply-b")));
    }
}
