// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `vigil-core::types` for use across the
//! store trait boundary. This module re-exports them for convenience within
//! the storage crate.

pub use vigil_core::types::{
    Actor, ActorId, ChannelLink, ConfigKey, CustomReply, EventId, Motivation, RelapseRecord,
    RelapseUpdate, WizardState,
};
