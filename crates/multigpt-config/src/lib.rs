// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for MultiGPT.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and diagnostic
//! error rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use multigpt_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("OpenRouter endpoint: {}", config.openrouter.base_url);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod render;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError, SourceFile};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::MultigptConfig;
pub use render::to_toml;

use tracing::debug;

/// Load configuration from the XDG hierarchy and validate it.
///
/// On Figment errors, the TOML sources are re-read so diagnostics can point
/// at the offending key.
pub fn load_and_validate() -> Result<MultigptConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            debug!(
                base_url = %config.openrouter.base_url,
                model_assisted = config.routing.model_assisted,
                "configuration loaded"
            );
            Ok(config)
        }
        Err(err) => {
            let toml_sources = collect_toml_sources();
            Err(diagnostic::figment_to_config_errors(err, &toml_sources))
        }
    }
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<MultigptConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            debug!(path = %path.display(), "configuration loaded");
            Ok(config)
        }
        Err(err) => {
            let sources = std::fs::read_to_string(path)
                .map(|content| vec![SourceFile::new(path.display().to_string(), content)])
                .unwrap_or_default();
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<MultigptConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![SourceFile::new("<inline>", toml_content)];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> Vec<SourceFile> {
    let mut sources = Vec::new();

    if let Ok(content) = std::fs::read_to_string(loader::LOCAL_CONFIG) {
        let path = std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG).display().to_string())
            .unwrap_or_else(|_| loader::LOCAL_CONFIG.to_string());
        sources.push(SourceFile::new(path, content));
    }

    if let Some(path) = loader::user_config_path()
        && let Ok(content) = std::fs::read_to_string(&path)
    {
        sources.push(SourceFile::new(path.display().to_string(), content));
    }

    let system_path = std::path::Path::new(loader::SYSTEM_CONFIG);
    if let Ok(content) = std::fs::read_to_string(system_path) {
        sources.push(SourceFile::new(system_path.display().to_string(), content));
    }

    sources
}
