// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword rule evaluation.
//!
//! Matches the query against the catalog's ordered keyword table. No LLM
//! call, no network, no latency.

use multigpt_core::{KeywordRule, RoutingDecision, RoutingTier};

/// Returns the decision of the first rule with a keyword contained in the query.
///
/// Matching is a case-insensitive substring test, so "hi" also matches inside
/// "this". Rules are evaluated in table order.
pub fn route_by_keywords(query: &str, rules: &[KeywordRule]) -> Option<RoutingDecision> {
    let lower = query.to_lowercase();

    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|rule| RoutingDecision {
            model: rule.model.to_string(),
            reason: rule.reason.to_string(),
            tier: RoutingTier::Keyword,
        })
}
