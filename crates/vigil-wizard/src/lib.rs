// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin wizard state machine for the Vigil streak bot.
//!
//! A finite per-actor state machine that interprets each inbound message as
//! the answer to a pending configuration question. Transitions are a pure
//! function; persisted mutations are returned as declarative
//! [`WizardEffect`] values for the dispatcher to apply.

pub mod fsm;
pub mod layout;

pub use fsm::{CANCEL_TOKEN, WizardEffect, WizardOutcome, advance, begin};
pub use layout::parse_layout;
