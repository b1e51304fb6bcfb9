// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion provider trait for upstream chat-completion services.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::MultigptError;
use crate::types::{ChatMessage, CompletionConfig};

/// Text increments of a streamed completion, in upstream emission order.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<String, MultigptError>> + Send>>;

/// Adapter for a chat-completion service.
///
/// Implementations perform exactly one network call per invocation and hold
/// no mutable state between calls.
#[async_trait]
pub trait CompletionProvider: Send + Sync + 'static {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Sends a non-streamed request and returns the full assistant text.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        config: &CompletionConfig,
    ) -> Result<String, MultigptError>;

    /// Sends a streamed request and returns the sequence of text increments.
    ///
    /// Configuration and upstream status errors are returned before the
    /// stream is produced.
    async fn stream(
        &self,
        messages: &[ChatMessage],
        config: &CompletionConfig,
    ) -> Result<ChunkStream, MultigptError>;
}
