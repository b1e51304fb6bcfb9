// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the completion client, router, store, and session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Author of a chat message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One turn of conversation context sent to the upstream model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Per-request completion parameters. Never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompletionConfig {
    /// Upstream model identifier.
    pub model: String,
    /// Sampling temperature; omitted from the request when `None`.
    pub temperature: Option<f32>,
    /// Generation cap; omitted from the request when `None`.
    pub max_tokens: Option<u32>,
}

impl CompletionConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Which stage of the router produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum RoutingTier {
    /// Matched a keyword rule.
    Keyword,
    /// Chosen by the auxiliary model.
    ModelAssisted,
    /// Nothing else applied.
    Default,
}

/// Model chosen for a query, with a human-readable justification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    pub model: String,
    pub reason: String,
    pub tier: RoutingTier,
}

/// The user's model choice for the next turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSelection {
    /// Let the router decide.
    Auto,
    /// Use this model id.
    Fixed(String),
}

impl ModelSelection {
    /// Reserved pseudo-identifier for router-driven selection.
    pub const AUTO_ID: &'static str = "auto";

    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case(Self::AUTO_ID) {
            ModelSelection::Auto
        } else {
            ModelSelection::Fixed(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ModelSelection::Auto => Self::AUTO_ID,
            ModelSelection::Fixed(id) => id,
        }
    }
}

/// Who is using the client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated {
        id: String,
        display_name: String,
        email: String,
    },
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        match self {
            Session::Anonymous => "Guest",
            Session::Authenticated { display_name, .. } => display_name,
        }
    }
}

/// A persisted conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A message as stored by a [`ConversationStore`](crate::ConversationStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: String,
    pub chat_id: String,
    pub role: Role,
    pub content: String,
    pub model_used: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&StoredMessage> for ChatMessage {
    fn from(message: &StoredMessage) -> Self {
        ChatMessage::new(message.role, message.content.clone())
    }
}

/// A message to be appended; the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub chat_id: String,
    pub role: Role,
    pub content: String,
    pub model_used: String,
}
