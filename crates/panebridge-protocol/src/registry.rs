use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;
use tokio::sync::oneshot;

/// Promise table for outstanding outbound requests.
///
/// One owning structure registers, resolves, and prunes exchanges keyed by
/// message identifier. Each exchange resolves at most once: the first inbound
/// envelope with a matching identifier completes it and removes the entry.
pub struct PendingExchanges {
    pending: Mutex<HashMap<String, oneshot::Sender<Value>>>,
}

impl PendingExchanges {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Register an exchange and return the receiver its reply resolves.
    pub fn register(&self, message_id: String) -> oneshot::Receiver<Value> {
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .expect("pending table lock poisoned")
            .insert(message_id, tx);
        rx
    }

    /// Resolve the exchange for `message_id` with the reply payload.
    ///
    /// Returns true if an exchange was waiting; false for unknown identifiers
    /// and for identifiers already resolved.
    pub fn resolve(&self, message_id: &str, data: Value) -> bool {
        let sender = self
            .pending
            .lock()
            .expect("pending table lock poisoned")
            .remove(message_id);

        match sender {
            // A dropped receiver means the caller gave up (e.g. timed out);
            // the exchange still counts as settled.
            Some(tx) => {
                let _ = tx.send(data);
                true
            }
            None => false,
        }
    }

    /// Remove an exchange without resolving it (timeout/cleanup path).
    pub fn prune(&self, message_id: &str) {
        self.pending
            .lock()
            .expect("pending table lock poisoned")
            .remove(message_id);
    }

    /// Number of outstanding exchanges.
    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .expect("pending table lock poisoned")
            .len()
    }

    /// Whether no exchanges are outstanding.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PendingExchanges {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PendingExchanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingExchanges")
            .field("outstanding", &self.len())
            .finish()
    }
}
