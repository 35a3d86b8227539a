// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the collaborators the core consumes.
//!
//! The persistence engine is external to the core: components depend on
//! [`SessionStore`] and never on a concrete backend.

pub mod sink;
pub mod store;

pub use sink::IntentSink;
pub use store::SessionStore;
