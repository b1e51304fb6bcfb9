// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation persistence for MultiGPT.
//!
//! Provides [`MemoryStore`], an in-process [`ConversationStore`] used in
//! local-only mode and by tests. Data lives for the lifetime of the process.
//!
//! [`ConversationStore`]: multigpt_core::ConversationStore

pub mod memory;

pub use memory::MemoryStore;
