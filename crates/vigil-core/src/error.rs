// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Vigil streak bot.

use thiserror::Error;

/// The primary error type used across all Vigil components.
///
/// The dispatcher treats these in three tiers: `DuplicateEvent` short-circuits
/// processing, `Validation` and `NotFound` recover locally with a user-facing
/// reply, and everything else is swallowed at the acknowledgment boundary
/// after logging.
#[derive(Debug, Error)]
pub enum VigilError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Transport surface errors (bind failure, malformed wire payload).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The event identifier already exists in the dedup ledger.
    ///
    /// Expected and non-fatal: the event was delivered more than once and has
    /// already been handled.
    #[error("duplicate event: {event_id}")]
    DuplicateEvent { event_id: String },

    /// Malformed user input (wrong wizard payload type, colliding content label).
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced content item is absent (e.g. delete of an unknown channel).
    #[error("{kind} not found: {key}")]
    NotFound { kind: String, key: String },

    /// The inner processing pipeline did not finish within the deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VigilError {
    /// True when this error is the dedup ledger's uniqueness violation.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, VigilError::DuplicateEvent { .. })
    }
}
