use async_trait::async_trait;
use futures_util::{stream, StreamExt};

use panebridge_wire::ChatRequest;

use crate::chat::{ChunkStream, CompletionError, CompletionSource};

/// Completion source that replays a fixed script.
///
/// Used by the CLI to exercise the protocol without a live backend, and by
/// tests to pin down each streaming outcome.
#[derive(Debug, Clone)]
pub struct ScriptedCompletion {
    script: Script,
}

#[derive(Debug, Clone)]
enum Script {
    /// `stream_chat` resolves to `Ok(None)`.
    Unavailable,
    /// `stream_chat` fails at call time.
    CallError(String),
    /// `stream_chat` yields these items in order.
    Items(Vec<Result<String, CompletionError>>),
}

impl ScriptedCompletion {
    /// Yield the given chunks, then end the stream normally.
    pub fn chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Script::Items(chunks.into_iter().map(|c| Ok(c.into())).collect()),
        }
    }

    /// Yield the given chunks, then fail mid-stream with `message`.
    pub fn failing_after<I, S>(chunks: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut items: Vec<Result<String, CompletionError>> =
            chunks.into_iter().map(|c| Ok(c.into())).collect();
        items.push(Err(CompletionError::backend(message)));
        Self {
            script: Script::Items(items),
        }
    }

    /// Report the model as unsupported (`Ok(None)`).
    pub fn unavailable() -> Self {
        Self {
            script: Script::Unavailable,
        }
    }

    /// Fail at call time, before any chunk is produced.
    pub fn call_error(message: impl Into<String>) -> Self {
        Self {
            script: Script::CallError(message.into()),
        }
    }
}

#[async_trait]
impl CompletionSource for ScriptedCompletion {
    async fn stream_chat(
        &self,
        _request: ChatRequest,
    ) -> Result<Option<ChunkStream>, CompletionError> {
        match &self.script {
            Script::Unavailable => Ok(None),
            Script::CallError(message) => Err(CompletionError::backend(message.clone())),
            Script::Items(items) => Ok(Some(stream::iter(items.clone()).boxed())),
        }
    }
}
