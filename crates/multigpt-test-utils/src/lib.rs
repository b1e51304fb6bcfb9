// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for MultiGPT.
//!
//! Provides a mock completion provider for fast, deterministic tests
//! without network access.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock completion provider with scripted replies and request capture

pub mod mock_provider;

pub use mock_provider::{MockProvider, MockReply, RecordedRequest};
