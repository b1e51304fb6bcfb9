// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory conversation store.
//!
//! All state sits behind one `RwLock`, so every operation is atomic with
//! respect to the others.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use multigpt_core::{Chat, ConversationStore, MultigptError, NewMessage, StoredMessage};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct Inner {
    chats: HashMap<String, ChatRecord>,
    /// Bumped on every write; breaks ties between equal timestamps.
    clock: u64,
}

#[derive(Debug)]
struct ChatRecord {
    chat: Chat,
    touched: u64,
    messages: Vec<StoredMessage>,
}

impl Inner {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn record_mut(&mut self, chat_id: &str) -> Result<&mut ChatRecord, MultigptError> {
        self.chats
            .get_mut(chat_id)
            .ok_or_else(|| MultigptError::Storage {
                message: format!("chat not found: {chat_id}"),
            })
    }
}

/// Process-local [`ConversationStore`]. Cloning shares the underlying data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn create_chat(&self, title: &str) -> Result<Chat, MultigptError> {
        let now = Utc::now();
        let chat = Chat {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            created_at: now,
            updated_at: now,
        };

        let mut inner = self.inner.write().await;
        let touched = inner.tick();
        inner.chats.insert(
            chat.id.clone(),
            ChatRecord {
                chat: chat.clone(),
                touched,
                messages: Vec::new(),
            },
        );
        debug!(chat_id = %chat.id, "created chat");
        Ok(chat)
    }

    async fn list_chats(&self) -> Result<Vec<Chat>, MultigptError> {
        let inner = self.inner.read().await;
        let mut records: Vec<&ChatRecord> = inner.chats.values().collect();
        records.sort_by(|a, b| {
            b.chat
                .updated_at
                .cmp(&a.chat.updated_at)
                .then(b.touched.cmp(&a.touched))
        });
        Ok(records.into_iter().map(|r| r.chat.clone()).collect())
    }

    async fn rename_chat(&self, chat_id: &str, title: &str) -> Result<(), MultigptError> {
        let mut inner = self.inner.write().await;
        let touched = inner.tick();
        let record = inner.record_mut(chat_id)?;
        record.chat.title = title.to_string();
        record.chat.updated_at = Utc::now();
        record.touched = touched;
        debug!(chat_id, "renamed chat");
        Ok(())
    }

    async fn append_message(&self, message: NewMessage) -> Result<StoredMessage, MultigptError> {
        let mut inner = self.inner.write().await;
        let touched = inner.tick();
        let record = inner.record_mut(&message.chat_id)?;

        // Keep timestamps non-decreasing within a chat.
        let mut timestamp = Utc::now();
        if let Some(last) = record.messages.last()
            && last.timestamp > timestamp
        {
            timestamp = last.timestamp;
        }

        let stored = StoredMessage {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id: message.chat_id,
            role: message.role,
            content: message.content,
            model_used: message.model_used,
            timestamp,
        };
        record.messages.push(stored.clone());
        record.chat.updated_at = timestamp;
        record.touched = touched;
        debug!(chat_id = %stored.chat_id, role = %stored.role, "appended message");
        Ok(stored)
    }

    async fn list_messages(&self, chat_id: &str) -> Result<Vec<StoredMessage>, MultigptError> {
        let inner = self.inner.read().await;
        match inner.chats.get(chat_id) {
            Some(record) => Ok(record.messages.clone()),
            None => Err(MultigptError::Storage {
                message: format!("chat not found: {chat_id}"),
            }),
        }
    }
}
