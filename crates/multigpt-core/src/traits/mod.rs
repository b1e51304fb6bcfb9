// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Both traits use `#[async_trait]` for dynamic dispatch compatibility so the
//! session layer can hold them as `Arc<dyn ...>`.

pub mod provider;
pub mod storage;

pub use provider::{ChunkStream, CompletionProvider};
pub use storage::ConversationStore;
