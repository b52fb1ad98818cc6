use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::trace;

use panebridge_wire::{ops, Envelope};

/// The single outbound connection to the webview panel.
///
/// All concurrent exchanges share one channel; sends are atomic, ordered,
/// non-blocking enqueue operations, so no two envelopes interleave. The
/// channel starts detached and gains a panel via [`attach`](Self::attach).
pub struct PanelChannel {
    outbound: Mutex<Option<UnboundedSender<Envelope>>>,
    next_id: AtomicU64,
}

impl PanelChannel {
    /// Create a detached channel.
    pub fn new() -> Self {
        Self {
            outbound: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Attach a panel and return its receiving side.
    ///
    /// Re-attaching replaces the previous connection; envelopes queued for the
    /// old panel are not re-delivered.
    pub fn attach(&self) -> UnboundedReceiver<Envelope> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.outbound.lock().expect("channel lock poisoned") = Some(tx);
        rx
    }

    /// Detach the panel. Further sends are dropped silently; in-flight
    /// handler logic is not unwound.
    pub fn detach(&self) {
        *self.outbound.lock().expect("channel lock poisoned") = None;
    }

    /// Whether a live panel is attached.
    pub fn is_attached(&self) -> bool {
        self.outbound
            .lock()
            .expect("channel lock poisoned")
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    /// Generate a fresh message identifier, unique within this process.
    pub fn next_message_id(&self) -> String {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        format!("msg-{id}")
    }

    /// Send an envelope to the panel, generating a `messageId` when none is
    /// given. Returns the identifier used.
    ///
    /// Never fails: a detached or disposed panel drops the envelope with a
    /// trace log.
    pub fn send(
        &self,
        message_type: &str,
        data: Value,
        message_id: Option<String>,
    ) -> String {
        let id = message_id.unwrap_or_else(|| self.next_message_id());
        trace!(message_type, message_id = %id, "sending message");

        let guard = self.outbound.lock().expect("channel lock poisoned");
        match guard.as_ref() {
            Some(tx) => {
                if tx.send(Envelope::new(message_type, id.clone(), data)).is_err() {
                    trace!(message_type, "panel receiver dropped, envelope discarded");
                }
            }
            None => trace!(message_type, "no panel attached, envelope discarded"),
        }

        id
    }

    /// Send a reply envelope: fixed reply marker, echoing `message_id`.
    pub fn reply(&self, message_id: &str, data: Value) {
        self.send(ops::REPLY, data, Some(message_id.to_string()));
    }
}

impl Default for PanelChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PanelChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelChannel")
            .field("attached", &self.is_attached())
            .finish()
    }
}
