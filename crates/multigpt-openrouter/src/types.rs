// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat-completion request/response types.

use multigpt_core::{ChatMessage, CompletionConfig};
use serde::{Deserialize, Serialize};

// --- Request types ---

/// A request to the `/chat/completions` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier (e.g., "google/gemma-3-12b-it:free").
    pub model: String,

    /// Full conversation context, oldest first.
    pub messages: Vec<ChatMessage>,

    /// Whether to stream the response as server-sent events.
    pub stream: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(messages: &[ChatMessage], config: &CompletionConfig, stream: bool) -> Self {
        Self {
            model: config.model.clone(),
            messages: messages.to_vec(),
            stream,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

// --- Non-streamed response types ---

/// Full response body of a non-streamed completion.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ResponseChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseChoice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

// --- Stream frame types ---

/// Payload of one `data:` frame in a streamed completion.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,

    /// Some providers report failures in-band after the stream has started.
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    /// Text carried by the first choice, if any and non-empty.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
            .filter(|s| !s.is_empty())
    }
}

// --- Error types ---

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}
