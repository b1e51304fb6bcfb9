// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation session loop for MultiGPT.
//!
//! [`ChatSession`] ties the router, the completion provider, and the
//! conversation store together: resolve the model, stream the reply into a
//! live turn, persist the exchange, and turn upstream failures into an
//! inline error turn.

pub mod session;
pub mod title;

pub use session::{ChatSession, Turn, TurnOutcome};
pub use title::chat_title;
