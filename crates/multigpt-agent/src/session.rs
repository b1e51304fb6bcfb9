// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A single conversation: the live transcript plus its persisted chat.
//!
//! One send runs: resolve model -> stream reply into the pending turn ->
//! persist the exchange. Upstream failures never escape `send`; they replace
//! the pending turn with an inline error notice. Store failures do escape.

use std::sync::Arc;

use futures::StreamExt;
use multigpt_config::model::ChatConfig;
use multigpt_core::{
    Chat, ChatMessage, CompletionConfig, CompletionProvider, ConversationStore, ModelSelection,
    MultigptError, NewMessage, Role, RoutingDecision,
};
use multigpt_router::QueryRouter;
use tracing::{debug, info, warn};

use crate::title::chat_title;

/// One entry in the live transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    /// Model that produced an assistant turn, or the selection a user turn was sent with.
    pub model: String,
    /// Set when the assistant turn is an error notice. Failed turns are never
    /// sent upstream as context.
    pub failed: bool,
}

/// Result of one [`ChatSession::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Model the reply was requested from.
    pub model: String,
    /// Router decision, when the selection was `auto`.
    pub routing: Option<RoutingDecision>,
    /// Full reply text, or the error notice when `failed`.
    pub reply: String,
    pub failed: bool,
}

/// Conversation session over a provider, a router, and a store.
pub struct ChatSession {
    provider: Arc<dyn CompletionProvider>,
    router: Arc<QueryRouter>,
    store: Arc<dyn ConversationStore>,
    selection: ModelSelection,
    default_title: String,
    chat: Option<Chat>,
    transcript: Vec<Turn>,
}

impl ChatSession {
    /// Creates a session with no active chat. The first send creates one.
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        router: Arc<QueryRouter>,
        store: Arc<dyn ConversationStore>,
        config: &ChatConfig,
    ) -> Self {
        Self {
            provider,
            router,
            store,
            selection: ModelSelection::parse(&config.default_model),
            default_title: config.default_title.clone(),
            chat: None,
            transcript: Vec::new(),
        }
    }

    pub fn selection(&self) -> &ModelSelection {
        &self.selection
    }

    /// Changes the model used for subsequent sends.
    pub fn set_selection(&mut self, selection: ModelSelection) {
        debug!(selection = selection.as_str(), "model selection changed");
        self.selection = selection;
    }

    /// The active chat, if one has been created or opened.
    pub fn chat(&self) -> Option<&Chat> {
        self.chat.as_ref()
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// Messages that would be sent upstream: every turn except failed ones.
    pub fn context(&self) -> Vec<ChatMessage> {
        self.transcript
            .iter()
            .filter(|turn| !turn.failed)
            .map(|turn| ChatMessage::new(turn.role, turn.content.clone()))
            .collect()
    }

    /// Detaches from the active chat. The next send starts a new one.
    pub fn new_chat(&mut self) {
        self.chat = None;
        self.transcript.clear();
    }

    /// Loads a persisted chat and its history into the session.
    pub async fn open_chat(&mut self, chat_id: &str) -> Result<(), MultigptError> {
        let chat = self
            .store
            .list_chats()
            .await?
            .into_iter()
            .find(|chat| chat.id == chat_id)
            .ok_or_else(|| MultigptError::Storage {
                message: format!("chat not found: {chat_id}"),
            })?;
        let messages = self.store.list_messages(chat_id).await?;

        self.transcript = messages
            .into_iter()
            .map(|m| Turn {
                role: m.role,
                content: m.content,
                model: m.model_used,
                failed: false,
            })
            .collect();
        info!(chat_id, turns = self.transcript.len(), "opened chat");
        self.chat = Some(chat);
        Ok(())
    }

    /// Sends a user message and streams the reply.
    ///
    /// `on_chunk` observes each increment in emission order as the pending
    /// turn grows. Returns `Ok(None)` for blank input without touching the
    /// store or the network.
    pub async fn send(
        &mut self,
        text: &str,
        on_chunk: Option<&mut (dyn FnMut(&str) + Send)>,
    ) -> Result<Option<TurnOutcome>, MultigptError> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let chat_id = self.ensure_chat(text).await?;
        let selection = self.selection.as_str().to_string();

        self.store
            .append_message(NewMessage {
                chat_id: chat_id.clone(),
                role: Role::User,
                content: text.to_string(),
                model_used: selection.clone(),
            })
            .await?;
        self.transcript.push(Turn {
            role: Role::User,
            content: text.to_string(),
            model: selection,
            failed: false,
        });

        let (model, routing) = match &self.selection {
            ModelSelection::Auto => {
                let decision = self.router.route(text).await;
                info!(
                    model = %decision.model,
                    tier = %decision.tier,
                    reason = %decision.reason,
                    "routing decision"
                );
                (decision.model.clone(), Some(decision))
            }
            ModelSelection::Fixed(id) => (id.clone(), None),
        };

        let context = self.context();
        self.transcript.push(Turn {
            role: Role::Assistant,
            content: String::new(),
            model: model.clone(),
            failed: false,
        });

        match self.stream_reply(&context, &model, on_chunk).await {
            Ok(reply) => {
                self.store
                    .append_message(NewMessage {
                        chat_id,
                        role: Role::Assistant,
                        content: reply.clone(),
                        model_used: model.clone(),
                    })
                    .await?;
                debug!(model = %model, chars = reply.len(), "reply persisted");
                Ok(Some(TurnOutcome {
                    model,
                    routing,
                    reply,
                    failed: false,
                }))
            }
            Err(e) => {
                warn!(model = %model, error = %e, "completion failed");
                let notice = format!("Error from {model}: {e}");
                if let Some(turn) = self.transcript.last_mut() {
                    turn.content = notice.clone();
                    turn.failed = true;
                }
                Ok(Some(TurnOutcome {
                    model,
                    routing,
                    reply: notice,
                    failed: true,
                }))
            }
        }
    }

    /// Streams the reply into the pending (last) turn and returns its full text.
    async fn stream_reply(
        &mut self,
        context: &[ChatMessage],
        model: &str,
        mut on_chunk: Option<&mut (dyn FnMut(&str) + Send)>,
    ) -> Result<String, MultigptError> {
        let config = CompletionConfig::new(model);
        let mut chunks = self.provider.stream(context, &config).await?;
        let mut reply = String::new();

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            reply.push_str(&chunk);
            if let Some(turn) = self.transcript.last_mut() {
                turn.content.push_str(&chunk);
            }
            if let Some(observer) = on_chunk.as_deref_mut() {
                observer(&chunk);
            }
        }
        Ok(reply)
    }

    /// Returns the active chat id, creating or retitling the chat as needed.
    async fn ensure_chat(&mut self, first_message: &str) -> Result<String, MultigptError> {
        let title = chat_title(first_message);

        if let Some(chat) = self.chat.as_mut() {
            if self.transcript.is_empty() || chat.title == self.default_title {
                self.store.rename_chat(&chat.id, &title).await?;
                chat.title = title;
            }
            return Ok(chat.id.clone());
        }

        let chat = self.store.create_chat(&title).await?;
        info!(chat_id = %chat.id, title = %chat.title, "started chat");
        let id = chat.id.clone();
        self.chat = Some(chat);
        Ok(id)
    }
}
