// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config errors as miette diagnostics.
//!
//! Unknown keys are located in the TOML file they came from and get a
//! "did you mean" hint from `strsim`.

// The Diagnostic derive assigns label fields it never reads back.
#![allow(unused_assignments)]

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Keys scoring below this Jaro-Winkler similarity get no suggestion.
const MIN_SIMILARITY: f64 = 0.75;

/// A TOML file that took part in loading, kept for error spans.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(multigpt::config::unknown_key),
        help("{}", ConfigError::help_for_unknown_key(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        /// Keys the section accepts, comma separated.
        valid_keys: String,
        #[label("not a multigpt setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(multigpt::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(multigpt::config::missing_key),
        help("set `{key}` in multigpt.toml")
    )]
    MissingKey { key: String },

    /// Parsed fine but failed a semantic check.
    #[error("validation error: {message}")]
    #[diagnostic(code(multigpt::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(multigpt::config::other))]
    Other(String),
}

impl ConfigError {
    fn help_for_unknown_key(suggestion: Option<&str>, valid_keys: &str) -> String {
        match suggestion {
            Some(key) => format!("did you mean `{key}`? Valid keys: {valid_keys}"),
            None => format!("valid keys: {valid_keys}"),
        }
    }

    /// Converts one figment error, pointing into `sources` when it can.
    fn from_figment(error: figment::Error, sources: &[SourceFile]) -> Self {
        let section: Vec<String> = error.path.iter().map(ToString::to_string).collect();

        match &error.kind {
            Kind::UnknownField(field, accepted) => {
                let located = source_for(&error, sources).and_then(|file| {
                    find_key_offset(&file.content, &section, field).map(|offset| {
                        (
                            SourceSpan::new(offset.into(), field.len()),
                            NamedSource::new(&file.name, file.content.clone()),
                        )
                    })
                });
                let (span, src) = located.unzip();

                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: suggest_key(field, accepted),
                    valid_keys: accepted.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: field.to_string(),
            },
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: section.join("."),
                detail: format!("found {actual}, expected {expected}"),
                expected: expected.clone(),
            },
            _ => ConfigError::Other(error.to_string()),
        }
    }
}

/// Expands a figment error, which may hold several, into diagnostics.
pub fn figment_to_config_errors(err: figment::Error, sources: &[SourceFile]) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| ConfigError::from_figment(error, sources))
        .collect()
}

/// The file an error came from. Inline TOML has no path, so a lone source is used.
fn source_for<'a>(error: &figment::Error, sources: &'a [SourceFile]) -> Option<&'a SourceFile> {
    let origin = error.metadata.as_ref().and_then(|m| m.source.as_ref());
    match origin {
        Some(figment::Source::File(path)) => {
            let name = path.display().to_string();
            sources.iter().find(|file| file.name == name)
        }
        _ if sources.len() == 1 => sources.first(),
        _ => None,
    }
}

/// Byte offset of `field` as a key inside the `[section]` named by `path`.
///
/// An empty `path` searches the top-level table, up to the first header.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let wanted = path.first().map(|section| format!("[{section}]"));
    let mut in_section = wanted.is_none();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        let trimmed = line.trim_start();
        if trimmed.starts_with('[') {
            in_section = wanted.as_deref() == Some(trimmed.trim_end());
            continue;
        }
        if !in_section {
            continue;
        }

        let is_key = trimmed
            .strip_prefix(field)
            .is_some_and(|rest| rest.trim_start().starts_with('='));
        if is_key {
            return Some(start + (line.len() - trimmed.len()));
        }
    }

    None
}

/// The accepted key closest to `unknown`, if any is similar enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > MIN_SIMILARITY)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Prints each error to stderr through miette's graphical report handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}
