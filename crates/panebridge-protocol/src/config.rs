use std::time::Duration;

use panebridge_wire::{ModelDescriptor, SessionInfo};

/// Configuration for a panel protocol instance.
#[derive(Debug, Clone)]
pub struct ProtocolConfig {
    /// Session bootstrap info returned for `onLoad`.
    pub session: SessionInfo,
    /// Models advertised via `config/getBrowserSerialized`.
    pub models: Vec<ModelDescriptor>,
    /// Maximum time to await a reply in [`request`](crate::PanelProtocol::request).
    ///
    /// `None` means requests wait forever; when set, a request with no
    /// matching reply resolves to `None` after the timeout and its pending
    /// entry is pruned.
    pub request_timeout: Option<Duration>,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            session: SessionInfo::default(),
            models: Vec::new(),
            request_timeout: None,
        }
    }
}
