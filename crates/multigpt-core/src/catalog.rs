// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static model catalog.
//!
//! The catalog is the single registry of model identifiers the client can
//! display and the router can name. The keyword rule table, the router's
//! candidate list, and its default and auxiliary models all live here so
//! they cannot drift apart.

use serde::Serialize;

/// Display metadata for one hosted model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub provider: &'static str,
    pub description: &'static str,
    pub strength: &'static str,
    pub cost: &'static str,
}

/// A keyword routing rule. Keywords are lowercase substrings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    pub keywords: &'static [&'static str],
    pub model: &'static str,
    pub reason: &'static str,
}

/// Read-only registry of models and routing tables.
#[derive(Debug, Clone, Copy)]
pub struct ModelCatalog {
    models: &'static [ModelInfo],
    rules: &'static [KeywordRule],
    default_model: &'static str,
    auxiliary_model: &'static str,
}

const GEMMA_27B: &str = "google/gemma-3-27b-it:free";
const GEMMA_12B: &str = "google/gemma-3-12b-it:free";
const GEMMA_4B: &str = "google/gemma-3-4b-it:free";
const GEMMA_3N: &str = "google/gemma-3n-e4b-it:free";
const GLM_AIR: &str = "z-ai/glm-4.5-air:free";
const NEMOTRON: &str = "nvidia/nemotron-3-nano-30b-a3b:free";

static BUILTIN_MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: GEMMA_27B,
        name: "Gemma 3 27B",
        provider: "Google",
        description: "Largest Gemma - best for complex analysis.",
        strength: "Deep Analysis",
        cost: "Free",
    },
    ModelInfo {
        id: GEMMA_12B,
        name: "Gemma 3 12B",
        provider: "Google",
        description: "Great balance of speed and capability.",
        strength: "General Purpose",
        cost: "Free",
    },
    ModelInfo {
        id: GEMMA_4B,
        name: "Gemma 3 4B",
        provider: "Google",
        description: "Fast and compact for quick tasks.",
        strength: "Quick Responses",
        cost: "Free",
    },
    ModelInfo {
        id: GEMMA_3N,
        name: "Gemma 3n 4B",
        provider: "Google",
        description: "Optimized for mobile and edge.",
        strength: "Efficient",
        cost: "Free",
    },
    ModelInfo {
        id: GLM_AIR,
        name: "GLM 4.5 Air",
        provider: "Z-AI",
        description: "Fast Chinese-English multilingual model.",
        strength: "Multilingual",
        cost: "Free",
    },
    ModelInfo {
        id: NEMOTRON,
        name: "Nemotron 3 Nano",
        provider: "NVIDIA",
        description: "Efficient reasoning and agentic tasks.",
        strength: "Reasoning",
        cost: "Free",
    },
];

// Evaluated top to bottom; the first rule with a matching keyword wins.
static BUILTIN_RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &[
            "code", "coding", "programming", "function", "debug", "javascript", "python",
            "java", "html", "css", "api", "algorithm", "software", "developer",
        ],
        model: NEMOTRON,
        reason: "Coding and reasoning task - using Nemotron for best results",
    },
    KeywordRule {
        keywords: &[
            "chinese", "mandarin", "中文", "translate", "translation", "multilingual",
            "language",
        ],
        model: GLM_AIR,
        reason: "Multilingual content - using GLM for best language support",
    },
    KeywordRule {
        keywords: &[
            "analyze", "analysis", "explain", "detailed", "comprehensive", "essay", "write",
            "story", "creative", "long", "article", "research",
        ],
        model: GEMMA_27B,
        reason: "Complex analysis task - using largest model for depth",
    },
    KeywordRule {
        keywords: &[
            "quick", "fast", "simple", "short", "brief", "hi", "hello", "hey", "thanks",
            "okay",
        ],
        model: GEMMA_4B,
        reason: "Quick response needed - using fast model",
    },
    KeywordRule {
        keywords: &[
            "math", "calculate", "logic", "reason", "solve", "problem", "think",
            "step by step",
        ],
        model: NEMOTRON,
        reason: "Reasoning task - using Nemotron for logical analysis",
    },
    KeywordRule {
        keywords: &["efficient", "mobile", "lightweight"],
        model: GEMMA_3N,
        reason: "Efficient response - using optimized model",
    },
];

static BUILTIN: ModelCatalog = ModelCatalog {
    models: BUILTIN_MODELS,
    rules: BUILTIN_RULES,
    default_model: GEMMA_12B,
    auxiliary_model: GEMMA_4B,
};

impl ModelCatalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> &'static ModelCatalog {
        &BUILTIN
    }

    /// All models, in display order.
    pub fn models(&self) -> &'static [ModelInfo] {
        self.models
    }

    /// Keyword rules, in evaluation order.
    pub fn rules(&self) -> &'static [KeywordRule] {
        self.rules
    }

    /// Model used when no routing tier produced a decision.
    pub fn default_model(&self) -> &'static str {
        self.default_model
    }

    /// Fast model the router asks when no keyword rule matches.
    pub fn auxiliary_model(&self) -> &'static str {
        self.auxiliary_model
    }

    /// Identifiers the model-assisted tier may return, in catalog order.
    pub fn candidate_ids(&self) -> impl Iterator<Item = &'static str> {
        self.models.iter().map(|m| m.id)
    }

    /// Looks up a model by exact identifier.
    pub fn get(&self, id: &str) -> Option<&'static ModelInfo> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Display name for an id, falling back to the id itself.
    pub fn display_name<'a>(&self, id: &'a str) -> &'a str {
        match self.get(id) {
            Some(info) => info.name,
            None => id,
        }
    }
}
