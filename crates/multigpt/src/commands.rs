// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `multigpt models`, `multigpt route`, and `multigpt config` command implementations.

use std::sync::Arc;

use colored::Colorize;
use multigpt_config::MultigptConfig;
use multigpt_core::{ModelCatalog, MultigptError, RoutingDecision};
use multigpt_openrouter::OpenRouterProvider;
use multigpt_router::QueryRouter;

/// Prints the model catalog, one model per line.
pub fn print_models() {
    println!("{}", "auto".bold().green());
    println!("    Picks a model per message from its content.");
    for model in ModelCatalog::builtin().models() {
        println!(
            "{}  {} ({}, {})",
            model.id.bold(),
            model.name,
            model.provider,
            model.cost.dimmed()
        );
        println!("    {} {}", format!("[{}]", model.strength).cyan(), model.description);
    }
}

/// Prints the effective configuration as TOML.
pub fn print_config(config: &MultigptConfig) -> Result<(), MultigptError> {
    let rendered =
        multigpt_config::to_toml(config).map_err(|e| MultigptError::Config(e.to_string()))?;
    print!("{rendered}");
    Ok(())
}

/// Routes one query and prints the decision.
///
/// Without an API key the model-assisted tier fails and the decision falls
/// back to the default model; that is reported, not treated as an error.
pub async fn run_route(config: &MultigptConfig, query: &str) -> Result<(), MultigptError> {
    let provider = Arc::new(OpenRouterProvider::new(config)?);
    if !provider.has_credential() {
        eprintln!(
            "{}",
            "warning: no OpenRouter API key configured; only keyword routing is available"
                .yellow()
        );
    }

    let router = QueryRouter::from_config(&config.routing, provider);
    let decision = router.route(query).await;
    println!("{}", format_decision(&decision));
    Ok(())
}

/// Renders a routing decision as `model  (tier) reason`.
pub fn format_decision(decision: &RoutingDecision) -> String {
    let name = ModelCatalog::builtin().display_name(&decision.model);
    format!(
        "{} [{}]  ({}) {}",
        decision.model.bold(),
        name,
        decision.tier,
        decision.reason
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use multigpt_core::RoutingTier;

    #[test]
    fn format_decision_includes_model_tier_and_reason() {
        colored::control::set_override(false);
        let decision = RoutingDecision {
            model: "z-ai/glm-4.5-air:free".into(),
            reason: "Multilingual content - using GLM for best language support".into(),
            tier: RoutingTier::Keyword,
        };
        assert_eq!(
            format_decision(&decision),
            "z-ai/glm-4.5-air:free [GLM 4.5 Air]  (keyword) Multilingual content - using GLM for best language support"
        );
    }
}
