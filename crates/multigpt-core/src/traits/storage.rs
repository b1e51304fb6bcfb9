// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation store trait.

use async_trait::async_trait;

use crate::error::MultigptError;
use crate::types::{Chat, NewMessage, StoredMessage};

/// Persistence for conversations and their messages.
///
/// The session layer only needs "save exchange" and "load history"; the
/// schema behind it is the backend's business.
#[async_trait]
pub trait ConversationStore: Send + Sync + 'static {
    /// Creates an empty conversation.
    async fn create_chat(&self, title: &str) -> Result<Chat, MultigptError>;

    /// Lists conversations, most recently updated first.
    async fn list_chats(&self) -> Result<Vec<Chat>, MultigptError>;

    /// Renames a conversation and bumps its `updated_at`.
    async fn rename_chat(&self, chat_id: &str, title: &str) -> Result<(), MultigptError>;

    /// Appends a message, stamping id and timestamp, and bumps the chat's `updated_at`.
    async fn append_message(&self, message: NewMessage) -> Result<StoredMessage, MultigptError>;

    /// Lists a conversation's messages in ascending timestamp order.
    async fn list_messages(&self, chat_id: &str) -> Result<Vec<StoredMessage>, MultigptError>;
}
