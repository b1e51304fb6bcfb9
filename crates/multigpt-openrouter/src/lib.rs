// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenRouter completion provider for MultiGPT.
//!
//! This crate implements [`CompletionProvider`] for the OpenRouter
//! OpenAI-compatible chat-completions API, providing both single-shot
//! completion and streaming SSE responses.

pub mod client;
pub mod sse;
pub mod types;

use async_trait::async_trait;
use futures::StreamExt;
use multigpt_config::MultigptConfig;
use multigpt_config::model::OpenRouterConfig;
use multigpt_core::{ChatMessage, ChunkStream, CompletionConfig, CompletionProvider, MultigptError};
use tracing::info;

use crate::client::OpenRouterClient;
use crate::types::ChatRequest;

/// Environment variable consulted when `openrouter.api_key` is unset.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// OpenRouter provider implementing [`CompletionProvider`].
///
/// API key resolution order: config -> `OPENROUTER_API_KEY` env var. A
/// missing key is reported per call as [`MultigptError::MissingCredential`].
#[derive(Debug, Clone)]
pub struct OpenRouterProvider {
    client: OpenRouterClient,
}

impl OpenRouterProvider {
    /// Creates a provider from the loaded configuration.
    pub fn new(config: &MultigptConfig) -> Result<Self, MultigptError> {
        let api_key = resolve_api_key(&config.openrouter.api_key);
        Self::from_parts(&config.openrouter, api_key)
    }

    /// Creates a provider from connection settings and an explicit key.
    pub fn from_parts(
        config: &OpenRouterConfig,
        api_key: Option<String>,
    ) -> Result<Self, MultigptError> {
        let client = OpenRouterClient::new(config, api_key)?;
        info!(
            endpoint = client.endpoint(),
            credential = client.has_credential(),
            "OpenRouter provider initialized"
        );
        Ok(Self { client })
    }

    /// Whether an API key is available.
    pub fn has_credential(&self) -> bool {
        self.client.has_credential()
    }

    /// Callback-shaped completion.
    ///
    /// Without `on_chunk`, waits for the full response and returns
    /// `Some(text)`. With `on_chunk`, streams the response, invokes the
    /// consumer once per increment in emission order, and returns `None`
    /// when the stream ends. Accumulating increments is the caller's job.
    pub async fn create_chat_completion(
        &self,
        messages: &[ChatMessage],
        config: &CompletionConfig,
        on_chunk: Option<&mut (dyn FnMut(&str) + Send)>,
    ) -> Result<Option<String>, MultigptError> {
        match on_chunk {
            None => self.complete(messages, config).await.map(Some),
            Some(consumer) => {
                let mut chunks = self.stream(messages, config).await?;
                while let Some(chunk) = chunks.next().await {
                    consumer(&chunk?);
                }
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        config: &CompletionConfig,
    ) -> Result<String, MultigptError> {
        info!(model = %config.model, messages = messages.len(), "requesting completion");
        let request = ChatRequest::new(messages, config, false);
        self.client.complete(&request).await
    }

    async fn stream(
        &self,
        messages: &[ChatMessage],
        config: &CompletionConfig,
    ) -> Result<ChunkStream, MultigptError> {
        info!(model = %config.model, messages = messages.len(), "requesting streamed completion");
        let request = ChatRequest::new(messages, config, true);
        self.client.stream(&request).await
    }
}

/// Resolves the API key from config or environment. Blank values count as unset.
fn resolve_api_key(config_key: &Option<String>) -> Option<String> {
    if let Some(key) = config_key
        && !key.trim().is_empty()
    {
        return Some(key.clone());
    }

    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
}
