// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Auto-mode model routing for MultiGPT.
//!
//! This crate provides:
//! - [`route_by_keywords`]: Ordered keyword rules (zero-cost, zero-latency)
//! - [`QueryRouter`]: Three-tier selection (keyword rules, auxiliary model, default)
//!
//! The router runs before a completion call when the user's selection is
//! `auto`, and always produces a decision naming a catalog model.

pub mod router;
pub mod rules;

pub use router::{MatchMode, QueryRouter, AI_SELECTED_REASON, DEFAULT_REASON};
pub use rules::route_by_keywords;
