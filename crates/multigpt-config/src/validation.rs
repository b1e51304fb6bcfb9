// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde attributes cannot express: URL shape,
//! known log levels, and catalog membership of every configured model id.

use multigpt_core::{ModelCatalog, ModelSelection};

use crate::diagnostic::ConfigError;
use crate::model::MultigptConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MultigptConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let catalog = ModelCatalog::builtin();

    let base_url = config.openrouter.base_url.trim();
    if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
        errors.push(ConfigError::Validation {
            message: format!(
                "openrouter.base_url `{base_url}` must start with http:// or https://"
            ),
        });
    }

    if config.openrouter.app_title.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "openrouter.app_title must not be empty".to_string(),
        });
    }

    if config.openrouter.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "openrouter.timeout_secs must be at least 1".to_string(),
        });
    }

    if let Some(key) = &config.openrouter.api_key
        && key.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "openrouter.api_key must not be empty when set".to_string(),
        });
    }

    for (field, id) in [
        ("routing.auxiliary_model", &config.routing.auxiliary_model),
        ("routing.default_model", &config.routing.default_model),
    ] {
        if !catalog.contains(id) {
            errors.push(unknown_model(field, id));
        }
    }

    if let ModelSelection::Fixed(id) = ModelSelection::parse(&config.chat.default_model)
        && !catalog.contains(&id)
    {
        errors.push(unknown_model("chat.default_model", &id));
    }

    if !LOG_LEVELS.contains(&config.chat.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "chat.log_level `{}` must be one of: {}",
                config.chat.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn unknown_model(field: &str, id: &str) -> ConfigError {
    let known: Vec<&str> = ModelCatalog::builtin().candidate_ids().collect();
    ConfigError::Validation {
        message: format!(
            "{field} `{id}` is not a known model (known: {})",
            known.join(", ")
        ),
    }
}
