//! Replaying adapter for the `LlmClient` port.

use crate::cassette::replayer::{replay, SharedReplayer};
use crate::ports::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};

/// Serves recorded completions.
pub struct ReplayingLlmClient {
    replayer: Option<SharedReplayer>,
}

impl ReplayingLlmClient {
    /// Creates a client backed by the given replayer.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer: Some(replayer) }
    }

    /// Creates a client with no cassette; every completion fails.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }
}

impl LlmClient for ReplayingLlmClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let input = serde_json::to_value(request).unwrap_or(serde_json::Value::Null);
        let result: Result<CompletionResponse, _> =
            replay(self.replayer.as_ref(), "llm", "complete", &input);
        Box::pin(async move { result })
    }
}
