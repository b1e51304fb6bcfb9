// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for MultiGPT.
//!
//! Provides the shared error type, the chat data model, the static model
//! catalog, and the adapter traits implemented by the completion client and
//! the conversation store.

pub mod catalog;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use catalog::{KeywordRule, ModelCatalog, ModelInfo};
pub use error::MultigptError;
pub use traits::{ChunkStream, CompletionProvider, ConversationStore};
pub use types::{
    Chat, ChatMessage, CompletionConfig, ModelSelection, NewMessage, Role, RoutingDecision,
    RoutingTier, Session, StoredMessage,
};
