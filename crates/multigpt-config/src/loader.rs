// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./multigpt.toml` > `~/.config/multigpt/multigpt.toml` >
//! `/etc/multigpt/multigpt.toml` with environment variable overrides via `MULTIGPT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MultigptConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/multigpt/multigpt.toml";
pub(crate) const LOCAL_CONFIG: &str = "multigpt.toml";

pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("multigpt").join(LOCAL_CONFIG))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/multigpt/multigpt.toml` (system-wide)
/// 3. `~/.config/multigpt/multigpt.toml` (user XDG config)
/// 4. `./multigpt.toml` (local directory)
/// 5. `MULTIGPT_*` environment variables
pub fn load_config() -> Result<MultigptConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<MultigptConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MultigptConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MultigptConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MultigptConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MultigptConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Environment provider mapping `MULTIGPT_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `MULTIGPT_OPENROUTER_API_KEY` must become
/// `openrouter.api_key`, not `openrouter.api.key`.
fn env_provider() -> Env {
    Env::prefixed("MULTIGPT_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("openrouter_", "openrouter.", 1)
            .replacen("routing_", "routing.", 1)
            .replacen("chat_", "chat.", 1);
        mapped.into()
    })
}
