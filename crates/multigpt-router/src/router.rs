// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Three-tier model routing for auto mode.
//!
//! Orchestrates model selection: keyword rules > auxiliary model > default.
//! Routing never fails; every error in the model-assisted tier degrades to
//! the default decision.

use std::sync::Arc;

use multigpt_config::model::RoutingConfig;
use multigpt_core::{
    ChatMessage, CompletionConfig, CompletionProvider, ModelCatalog, RoutingDecision, RoutingTier,
};
use tracing::{debug, info, warn};

use crate::rules::route_by_keywords;

/// Reason attached to a decision made by the auxiliary model.
pub const AI_SELECTED_REASON: &str = "AI-selected best model for this query";

/// Reason attached to the fallback decision.
pub const DEFAULT_REASON: &str = "General purpose model for balanced response";

/// How the auxiliary model's reply is matched against candidate ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// The trimmed reply contains the id anywhere.
    #[default]
    Substring,
    /// The trimmed reply is exactly the id.
    Exact,
}

impl MatchMode {
    fn matches(self, reply: &str, candidate: &str) -> bool {
        match self {
            MatchMode::Substring => reply.contains(candidate),
            MatchMode::Exact => reply == candidate,
        }
    }
}

/// Routes a query to a catalog model.
///
/// Holds no mutable state, so one router can serve concurrent sessions.
pub struct QueryRouter {
    provider: Arc<dyn CompletionProvider>,
    catalog: &'static ModelCatalog,
    match_mode: MatchMode,
    model_assisted: bool,
    auxiliary_model: String,
    default_model: String,
}

impl QueryRouter {
    /// Create a router over the built-in catalog with default settings.
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self::from_config(&RoutingConfig::default(), provider)
    }

    /// Create a router from the `[routing]` config section.
    pub fn from_config(config: &RoutingConfig, provider: Arc<dyn CompletionProvider>) -> Self {
        let match_mode = if config.strict_match {
            MatchMode::Exact
        } else {
            MatchMode::Substring
        };
        Self {
            provider,
            catalog: ModelCatalog::builtin(),
            match_mode,
            model_assisted: config.model_assisted,
            auxiliary_model: config.auxiliary_model.clone(),
            default_model: config.default_model.clone(),
        }
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Route a query to the appropriate model.
    ///
    /// Priority order:
    /// 1. First keyword rule with a keyword contained in the lowercased query
    /// 2. Candidate id found in the auxiliary model's reply
    /// 3. Default model
    pub async fn route(&self, query: &str) -> RoutingDecision {
        if let Some(decision) = route_by_keywords(query, self.catalog.rules()) {
            info!(model = %decision.model, reason = %decision.reason, "keyword match");
            return decision;
        }

        if self.model_assisted
            && let Some(model) = self.ask_auxiliary(query).await
        {
            info!(model = %model, "auxiliary model selected");
            return RoutingDecision {
                model,
                reason: AI_SELECTED_REASON.to_string(),
                tier: RoutingTier::ModelAssisted,
            };
        }

        info!(model = %self.default_model, "using default model");
        RoutingDecision {
            model: self.default_model.clone(),
            reason: DEFAULT_REASON.to_string(),
            tier: RoutingTier::Default,
        }
    }

    /// Asks the auxiliary model to pick a candidate. Errors are logged and swallowed.
    async fn ask_auxiliary(&self, query: &str) -> Option<String> {
        let messages = [
            ChatMessage::system(selection_prompt(self.catalog)),
            ChatMessage::user(query),
        ];
        let config = CompletionConfig::new(self.auxiliary_model.as_str()).with_temperature(0.0);

        match self.provider.complete(&messages, &config).await {
            Ok(reply) => {
                let found = match_reply(self.catalog, &reply, self.match_mode);
                if found.is_none() {
                    debug!(reply = %reply.trim(), "auxiliary reply named no candidate");
                }
                found.map(str::to_string)
            }
            Err(e) => {
                warn!(error = %e, model = %self.auxiliary_model, "routing error");
                None
            }
        }
    }
}

/// System prompt listing every candidate id with its strength.
fn selection_prompt(catalog: &ModelCatalog) -> String {
    let mut prompt = String::from(
        "Pick the best model for this query. Reply with ONLY the model ID, nothing else.\nModels:",
    );
    for model in catalog.models() {
        prompt.push_str(&format!("\n- {} ({})", model.id, model.strength.to_lowercase()));
    }
    prompt
}

/// First candidate, in catalog order, matched by the trimmed reply.
fn match_reply(catalog: &ModelCatalog, reply: &str, mode: MatchMode) -> Option<&'static str> {
    let reply = reply.trim();
    if reply.is_empty() {
        return None;
    }
    catalog.candidate_ids().find(|id| mode.matches(reply, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use multigpt_core::Role;
    use multigpt_test_utils::{MockProvider, MockReply};
    use tracing_test::traced_test;

    const GEMMA_27B: &str = "google/gemma-3-27b-it:free";
    const GEMMA_12B: &str = "google/gemma-3-12b-it:free";
    const GEMMA_4B: &str = "google/gemma-3-4b-it:free";
    const NEMOTRON: &str = "nvidia/nemotron-3-nano-30b-a3b:free";

    fn router_with(replies: Vec<MockReply>) -> (QueryRouter, Arc<MockProvider>) {
        router_with_config(RoutingConfig::default(), replies)
    }

    fn router_with_config(
        config: RoutingConfig,
        replies: Vec<MockReply>,
    ) -> (QueryRouter, Arc<MockProvider>) {
        let provider = Arc::new(MockProvider::with_replies(replies));
        let router = QueryRouter::from_config(&config, provider.clone());
        (router, provider)
    }

    #[tokio::test]
    async fn keyword_match_skips_auxiliary_call() {
        let (router, provider) = router_with(vec![]);
        let decision = router.route("debug this python function").await;
        assert_eq!(decision.model, NEMOTRON);
        assert_eq!(
            decision.reason,
            "Coding and reasoning task - using Nemotron for best results"
        );
        assert_eq!(decision.tier, RoutingTier::Keyword);
        assert_eq!(provider.call_count().await, 0);
    }

    #[tokio::test]
    async fn auxiliary_reply_containing_id_is_selected() {
        let (router, provider) = router_with(vec![MockReply::Text(format!(
            "{GEMMA_27B} please use this"
        ))]);
        let decision = router.route("xyzzy plugh").await;
        assert_eq!(decision.model, GEMMA_27B);
        assert_eq!(decision.reason, AI_SELECTED_REASON);
        assert_eq!(decision.tier, RoutingTier::ModelAssisted);

        let requests = provider.requests().await;
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert!(!request.streamed);
        assert_eq!(request.config.model, GEMMA_4B);
        assert_eq!(request.config.temperature, Some(0.0));
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[1], ChatMessage::user("xyzzy plugh"));
    }

    #[tokio::test]
    #[traced_test]
    async fn auxiliary_error_falls_back_to_default() {
        let (router, _provider) = router_with(vec![MockReply::Fail("upstream down".into())]);
        let decision = router.route("xyzzy plugh").await;
        assert_eq!(decision.model, GEMMA_12B);
        assert_eq!(decision.reason, DEFAULT_REASON);
        assert_eq!(decision.tier, RoutingTier::Default);
        assert!(logs_contain("routing error"));
    }

    #[tokio::test]
    async fn empty_reply_falls_back_to_default() {
        let (router, _provider) = router_with(vec![MockReply::Text("   ".into())]);
        let decision = router.route("xyzzy plugh").await;
        assert_eq!(decision.model, GEMMA_12B);
        assert_eq!(decision.tier, RoutingTier::Default);
    }

    #[tokio::test]
    async fn reply_without_candidate_falls_back_to_default() {
        let (router, _provider) =
            router_with(vec![MockReply::Text("I think gpt-4 would be best".into())]);
        let decision = router.route("xyzzy plugh").await;
        assert_eq!(decision.model, GEMMA_12B);
        assert_eq!(decision.reason, DEFAULT_REASON);
    }

    #[tokio::test]
    async fn first_candidate_in_catalog_order_wins() {
        let (router, _provider) =
            router_with(vec![MockReply::Text(format!("{NEMOTRON} or {GEMMA_27B}"))]);
        let decision = router.route("xyzzy plugh").await;
        assert_eq!(decision.model, GEMMA_27B);
    }

    #[tokio::test]
    async fn strict_mode_requires_exact_reply() {
        let config = RoutingConfig {
            strict_match: true,
            ..RoutingConfig::default()
        };
        let (router, _provider) = router_with_config(
            config.clone(),
            vec![MockReply::Text(format!("{GEMMA_27B} please use this"))],
        );
        assert_eq!(router.match_mode(), MatchMode::Exact);
        assert_eq!(router.route("xyzzy plugh").await.model, GEMMA_12B);

        let (router, _provider) =
            router_with_config(config, vec![MockReply::Text(format!("  {GEMMA_27B}\n"))]);
        let decision = router.route("xyzzy plugh").await;
        assert_eq!(decision.model, GEMMA_27B);
        assert_eq!(decision.tier, RoutingTier::ModelAssisted);
    }

    #[tokio::test]
    async fn disabled_model_assist_goes_straight_to_default() {
        let config = RoutingConfig {
            model_assisted: false,
            ..RoutingConfig::default()
        };
        let (router, provider) =
            router_with_config(config, vec![MockReply::Text(GEMMA_27B.into())]);
        let decision = router.route("xyzzy plugh").await;
        assert_eq!(decision.model, GEMMA_12B);
        assert_eq!(provider.call_count().await, 0);
    }

    #[tokio::test]
    async fn every_decision_names_a_catalog_model() {
        let catalog = ModelCatalog::builtin();
        let queries = [
            "debug this", "中文", "essay", "hi", "math", "mobile", "xyzzy", "",
        ];
        for query in queries {
            let (router, _provider) = router_with(vec![MockReply::Text("nonsense".into())]);
            let decision = router.route(query).await;
            assert!(catalog.contains(&decision.model), "{query:?} -> {}", decision.model);
        }
    }

    #[test]
    fn selection_prompt_lists_all_candidates() {
        let catalog = ModelCatalog::builtin();
        let prompt = selection_prompt(catalog);
        assert!(prompt.starts_with("Pick the best model for this query."));
        for id in catalog.candidate_ids() {
            assert!(prompt.contains(id), "prompt is missing {id}");
        }
        assert!(prompt.contains("(reasoning)"));
    }

    #[test]
    fn match_reply_modes() {
        let catalog = ModelCatalog::builtin();
        assert_eq!(
            match_reply(catalog, "use google/gemma-3-4b-it:free.", MatchMode::Substring),
            Some(GEMMA_4B)
        );
        assert_eq!(
            match_reply(catalog, "use google/gemma-3-4b-it:free.", MatchMode::Exact),
            None
        );
        assert_eq!(match_reply(catalog, "", MatchMode::Substring), None);
        assert_eq!(match_reply(catalog, "auto", MatchMode::Substring), None);
    }
}
