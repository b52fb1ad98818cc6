//! The single duplex connection to the webview panel.
//!
//! This is the lowest layer of panebridge. It owns outbound delivery and
//! message-identifier generation; everything else builds on the
//! [`PanelChannel`] type provided here.
//!
//! A panel may not exist yet, or may have been disposed: sends against a
//! detached channel are dropped silently rather than failing, matching the
//! fire-and-forget contract of the underlying postMessage transport.

pub mod panel;

pub use panel::PanelChannel;
