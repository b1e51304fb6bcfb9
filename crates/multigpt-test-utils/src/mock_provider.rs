// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion provider for deterministic testing.
//!
//! `MockProvider` implements `CompletionProvider` with pre-configured replies,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream;
use tokio::sync::Mutex;

use multigpt_core::{ChatMessage, ChunkStream, CompletionConfig, CompletionProvider, MultigptError};

/// One scripted reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Full text. Streamed as word-sized increments.
    Text(String),
    /// Explicit stream increments. `complete` returns their concatenation.
    Chunks(Vec<String>),
    /// Increments followed by a mid-stream transport failure.
    ChunksThenFail(Vec<String>, String),
    /// Upstream failure with this message, raised before any increment.
    Fail(String),
}

/// A request the mock received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub messages: Vec<ChatMessage>,
    pub config: CompletionConfig,
    pub streamed: bool,
}

/// A mock completion provider that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned.
#[derive(Clone, Default)]
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty reply queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock provider pre-loaded with text replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self::with_replies(responses.into_iter().map(MockReply::Text).collect())
    }

    /// Create a mock provider pre-loaded with scripted replies.
    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            requests: Arc::default(),
        }
    }

    /// Add a reply to the end of the queue.
    pub async fn add_reply(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of calls received so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    async fn next_reply(
        &self,
        messages: &[ChatMessage],
        config: &CompletionConfig,
        streamed: bool,
    ) -> MockReply {
        self.requests.lock().await.push(RecordedRequest {
            messages: messages.to_vec(),
            config: config.clone(),
            streamed,
        });
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockReply::Text("mock response".to_string()))
    }
}

fn upstream(model: &str, message: String) -> MultigptError {
    MultigptError::Upstream {
        model: model.to_string(),
        status: Some(500),
        message,
    }
}

/// Splits text into increments at word boundaries, keeping whitespace.
fn split_words(text: &str) -> Vec<String> {
    text.split_inclusive(' ').map(str::to_string).collect()
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        config: &CompletionConfig,
    ) -> Result<String, MultigptError> {
        match self.next_reply(messages, config, false).await {
            MockReply::Text(text) => Ok(text),
            MockReply::Chunks(chunks) => Ok(chunks.concat()),
            MockReply::ChunksThenFail(_, message) | MockReply::Fail(message) => {
                Err(upstream(&config.model, message))
            }
        }
    }

    async fn stream(
        &self,
        messages: &[ChatMessage],
        config: &CompletionConfig,
    ) -> Result<ChunkStream, MultigptError> {
        let items: Vec<Result<String, MultigptError>> =
            match self.next_reply(messages, config, true).await {
                MockReply::Text(text) => split_words(&text).into_iter().map(Ok).collect(),
                MockReply::Chunks(chunks) => chunks.into_iter().map(Ok).collect(),
                MockReply::ChunksThenFail(chunks, message) => chunks
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(MultigptError::Transport {
                        message,
                        source: None,
                    })))
                    .collect(),
                MockReply::Fail(message) => return Err(upstream(&config.model, message)),
            };
        Ok(Box::pin(stream::iter(items)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn config() -> CompletionConfig {
        CompletionConfig::new("test-model")
    }

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let provider = MockProvider::new();
        let text = provider.complete(&[], &config()).await.unwrap();
        assert_eq!(text, "mock response");
    }

    #[tokio::test]
    async fn queued_responses_returned_in_order() {
        let provider = MockProvider::with_responses(vec![
            "first".to_string(),
            "second".to_string(),
        ]);
        assert_eq!(provider.complete(&[], &config()).await.unwrap(), "first");
        assert_eq!(provider.complete(&[], &config()).await.unwrap(), "second");
        // Queue exhausted, falls back to default
        assert_eq!(provider.complete(&[], &config()).await.unwrap(), "mock response");
        assert_eq!(provider.call_count().await, 3);
    }

    #[tokio::test]
    async fn stream_text_concatenates_to_original() {
        let provider = MockProvider::with_responses(vec!["streamed text here".to_string()]);
        let chunks: Vec<String> = provider
            .stream(&[], &config())
            .await
            .unwrap()
            .map(|c| c.unwrap())
            .collect()
            .await;
        assert_eq!(chunks, vec!["streamed ", "text ", "here"]);
        assert_eq!(chunks.concat(), "streamed text here");
    }

    #[tokio::test]
    async fn fail_reply_is_upstream_error() {
        let provider = MockProvider::with_replies(vec![MockReply::Fail("boom".into())]);
        let err = provider.stream(&[], &config()).await.err().unwrap();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn chunks_then_fail_ends_with_transport_error() {
        let provider = MockProvider::with_replies(vec![MockReply::ChunksThenFail(
            vec!["par".into(), "tial".into()],
            "connection reset".into(),
        )]);
        let items: Vec<Result<String, MultigptError>> =
            provider.stream(&[], &config()).await.unwrap().collect().await;
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_deref().unwrap(), "par");
        assert!(matches!(items[2], Err(MultigptError::Transport { .. })));
    }

    #[tokio::test]
    async fn records_requests() {
        let provider = MockProvider::new();
        provider.add_reply(MockReply::Text("ok".into())).await;
        let messages = [ChatMessage::system("sys"), ChatMessage::user("hi")];
        provider
            .complete(&messages, &config().with_temperature(0.0))
            .await
            .unwrap();

        let requests = provider.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages, messages.to_vec());
        assert_eq!(requests[0].config.temperature, Some(0.0));
        assert!(!requests[0].streamed);
    }
}
