use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;
use futures_util::StreamExt;
use tracing::debug;

use panebridge_wire::{ChatChunk, ChatRequest, StreamDone};

use crate::protocol::Replier;

/// Fixed user-facing message for models the completion source cannot serve.
///
/// This is a normal outcome, distinct from backend failures, and keeps the
/// upstream wording so existing panels render it unchanged.
pub const MODEL_UNAVAILABLE: &str = "暂不支持此模型的使用";

/// Errors raised by a completion source, at call time or mid-stream.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CompletionError {
    /// The backend rejected or aborted the completion.
    #[error("{0}")]
    Backend(String),
}

impl CompletionError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

/// An in-flight chat completion: an asynchronous, possibly unbounded sequence
/// of content chunks. An `Err` item ends the stream.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<String, CompletionError>> + Send>>;

/// External completion backend consumed by the streaming chat handler.
///
/// `Ok(None)` means the requested model/configuration is not supported —
/// reported to the user as [`MODEL_UNAVAILABLE`], not as an error.
#[async_trait]
pub trait CompletionSource: Send + Sync {
    async fn stream_chat(
        &self,
        request: ChatRequest,
    ) -> Result<Option<ChunkStream>, CompletionError>;
}

/// Bridge one chat completion onto the reply channel.
///
/// Relays each produced chunk as a separate content reply, strictly in
/// production order, and ends with exactly one `{done: true}` terminal
/// marker on every path: natural end of stream, unsupported model, error at
/// call time, or error mid-stream after some chunks were already sent.
/// Failures are contained here; nothing propagates to the dispatcher.
pub(crate) async fn run_stream_chat(
    source: &dyn CompletionSource,
    request: ChatRequest,
    replier: &Replier,
) {
    match source.stream_chat(request).await {
        Ok(Some(mut chunks)) => {
            while let Some(next) = chunks.next().await {
                match next {
                    Ok(content) => replier.send(&ChatChunk::new(content)),
                    Err(err) => {
                        debug!(error = %err, "completion stream failed mid-flight");
                        replier.send(&ChatChunk::new(format!("Error: {err}")));
                        break;
                    }
                }
            }
        }
        Ok(None) => replier.send(&ChatChunk::new(MODEL_UNAVAILABLE)),
        Err(err) => {
            debug!(error = %err, "completion source rejected request");
            replier.send(&ChatChunk::new(format!("Error: {err}")));
        }
    }

    replier.send(&StreamDone::default());
}
