// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for MultiGPT.

use thiserror::Error;

/// The primary error type shared by the completion client, store, and session layers.
///
/// The router never returns this type: every routing failure degrades to a
/// default decision instead.
#[derive(Debug, Error)]
pub enum MultigptError {
    /// No upstream credential is configured. Raised before any network call.
    #[error("OpenRouter API key is not configured (set openrouter.api_key or OPENROUTER_API_KEY)")]
    MissingCredential,

    /// Other configuration errors (invalid header values, unknown model ids).
    #[error("configuration error: {0}")]
    Config(String),

    /// The upstream completion service answered with a non-success status.
    ///
    /// `message` carries the upstream `error.message` when the body had one,
    /// otherwise a status-derived message.
    #[error("{message}")]
    Upstream {
        model: String,
        status: Option<u16>,
        message: String,
    },

    /// The request could not be sent, or the response stream broke mid-way.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A complete (non-streamed) response body could not be decoded.
    #[error("decode error: {message}")]
    Decode {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Conversation store errors (unknown chat, backend failure).
    #[error("storage error: {message}")]
    Storage { message: String },

    /// Failures outside the completion and storage paths, such as terminal setup.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MultigptError {
    /// Returns the upstream HTTP status, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            MultigptError::Upstream { status, .. } => *status,
            _ => None,
        }
    }
}
