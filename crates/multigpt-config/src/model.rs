// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for MultiGPT.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use multigpt_core::ModelCatalog;
use serde::{Deserialize, Serialize};

/// Top-level MultiGPT configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MultigptConfig {
    /// Upstream completion service settings.
    #[serde(default)]
    pub openrouter: OpenRouterConfig,

    /// Auto-mode routing settings.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Chat session settings.
    #[serde(default)]
    pub chat: ChatConfig,
}

/// OpenRouter API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenRouterConfig {
    /// API key. `None` falls back to the `OPENROUTER_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API (without `/chat/completions`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Origin sent in the `HTTP-Referer` header.
    #[serde(default = "default_referer")]
    pub referer: String,

    /// Application name sent in the `X-Title` header.
    #[serde(default = "default_app_title")]
    pub app_title: String,

    /// Seconds allowed for connecting, and for each wait between reads.
    ///
    /// There is no deadline on the whole response, so a stream that keeps
    /// producing frames runs to completion.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            referer: default_referer(),
            app_title: default_app_title(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_referer() -> String {
    "http://localhost".to_string()
}

fn default_app_title() -> String {
    "MULTIGPT".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

/// Auto-mode routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Ask the auxiliary model when no keyword rule matches.
    #[serde(default = "default_true")]
    pub model_assisted: bool,

    /// Accept the auxiliary reply only when it equals a model id after trimming,
    /// instead of merely containing one.
    #[serde(default)]
    pub strict_match: bool,

    /// Model asked for the model-assisted decision.
    #[serde(default = "default_auxiliary_model")]
    pub auxiliary_model: String,

    /// Model returned when no tier produced a decision.
    #[serde(default = "default_routing_model")]
    pub default_model: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            model_assisted: true,
            strict_match: false,
            auxiliary_model: default_auxiliary_model(),
            default_model: default_routing_model(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_auxiliary_model() -> String {
    ModelCatalog::builtin().auxiliary_model().to_string()
}

fn default_routing_model() -> String {
    ModelCatalog::builtin().default_model().to_string()
}

/// Chat session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Initial model selection: a catalog id or `auto`.
    #[serde(default = "default_chat_model")]
    pub default_model: String,

    /// Title given to newly created conversations.
    #[serde(default = "default_chat_title")]
    pub default_title: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_model: default_chat_model(),
            default_title: default_chat_title(),
            log_level: default_log_level(),
        }
    }
}

fn default_chat_model() -> String {
    "auto".to_string()
}

fn default_chat_title() -> String {
    "New Chat".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
