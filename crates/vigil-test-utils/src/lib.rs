// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Vigil integration tests.
//!
//! Provides a dispatcher harness over temp SQLite storage and inbound event
//! builders for fast, deterministic, CI-runnable tests without external
//! services.

pub mod events;
pub mod harness;

pub use events::{action_event, media_event, text_event};
pub use harness::{TestHarness, TestHarnessBuilder};
