// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Renders the effective configuration back to TOML for display.

use crate::diagnostic::ConfigError;
use crate::model::MultigptConfig;

/// Placeholder printed instead of a configured API key.
pub const REDACTED: &str = "<redacted>";

/// Serializes the configuration as TOML with the API key redacted.
pub fn to_toml(config: &MultigptConfig) -> Result<String, ConfigError> {
    let mut shown = config.clone();
    if shown.openrouter.api_key.is_some() {
        shown.openrouter.api_key = Some(REDACTED.to_string());
    }
    toml::to_string_pretty(&shown)
        .map_err(|e| ConfigError::Other(format!("failed to render config: {e}")))
}
