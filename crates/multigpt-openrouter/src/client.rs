// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenRouter chat-completions endpoint.
//!
//! Provides [`OpenRouterClient`] which handles request construction,
//! authentication, attribution headers, and status error mapping. Every
//! public call performs exactly one HTTP request; nothing is retried.

use std::time::Duration;

use multigpt_config::model::OpenRouterConfig;
use multigpt_core::{ChunkStream, MultigptError};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::sse;
use crate::types::{ApiErrorResponse, ChatCompletionResponse, ChatRequest};

/// HTTP client for OpenRouter API communication.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl OpenRouterClient {
    /// Creates a client from connection settings and an already-resolved key.
    ///
    /// A missing key is not an error here; it is reported on the first call.
    pub fn new(config: &OpenRouterConfig, api_key: Option<String>) -> Result<Self, MultigptError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "http-referer",
            HeaderValue::from_str(&config.referer).map_err(|e| {
                MultigptError::Config(format!("invalid referer header value: {e}"))
            })?,
        );
        headers.insert(
            "x-title",
            HeaderValue::from_str(&config.app_title).map_err(|e| {
                MultigptError::Config(format!("invalid app title header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .read_timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MultigptError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint_url(&config.base_url),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether a credential is available for calls.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Sends a non-streamed request and returns the first choice's text.
    pub async fn complete(&self, request: &ChatRequest) -> Result<String, MultigptError> {
        let mut req = request.clone();
        req.stream = false;

        let response = self.send(&req).await?;
        let body = response.text().await.map_err(|e| MultigptError::Transport {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| MultigptError::Decode {
                message: format!("failed to parse completion response: {e}"),
                source: Some(Box::new(e)),
            })?;

        match parsed.choices.into_iter().next() {
            Some(choice) => Ok(choice.message.content.unwrap_or_default()),
            None => Err(MultigptError::Decode {
                message: format!("completion response from {} had no choices", req.model),
                source: None,
            }),
        }
    }

    /// Sends a streamed request and returns the text increments.
    ///
    /// Status errors surface here, before any increment is produced.
    pub async fn stream(&self, request: &ChatRequest) -> Result<ChunkStream, MultigptError> {
        let mut req = request.clone();
        req.stream = true;

        let response = self.send(&req).await?;
        Ok(sse::parse_sse_stream(response, req.model))
    }

    async fn send(&self, request: &ChatRequest) -> Result<reqwest::Response, MultigptError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(MultigptError::MissingCredential);
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| MultigptError::Transport {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model = %request.model, stream = request.stream, "response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(upstream_error(&request.model, status.as_u16(), &body))
    }
}

/// Appends the chat-completions path to a base URL.
fn endpoint_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// Builds the error for a non-success status, preferring the upstream message.
fn upstream_error(model: &str, status: u16, body: &str) -> MultigptError {
    let upstream_message = serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .and_then(|e| e.error.message)
        .filter(|m| !m.trim().is_empty());

    let message = match upstream_message {
        Some(message) => message,
        None => format!("Model {model} failed with status {status}"),
    };

    MultigptError::Upstream {
        model: model.to_string(),
        status: Some(status),
        message,
    }
}
