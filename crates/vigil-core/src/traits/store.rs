// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session store trait: the document-store interface the core consumes.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::VigilError;
use crate::types::{
    Actor, ActorId, ChannelLink, ConfigKey, CustomReply, EventId, HealthStatus, Motivation,
    RelapseRecord, RelapseUpdate, WizardState,
};

/// Key-addressed persistence for actors, configuration entries, content
/// items, and the dedup ledger.
///
/// Implementations must enforce the dedup uniqueness check atomically in the
/// store (not read-then-write) -- it is the sole mechanism preventing
/// duplicate side effects for redelivered events.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Opens the backend and runs pending migrations. Idempotence across
    /// process restarts is required; double-init within one process is an error.
    async fn initialize(&self) -> Result<(), VigilError>;

    /// Flushes pending writes and releases the backend.
    async fn close(&self) -> Result<(), VigilError>;

    /// Cheap liveness probe of the backend.
    async fn health_check(&self) -> Result<HealthStatus, VigilError>;

    // --- Actors ---

    /// Look up an actor by identity.
    async fn find_actor(&self, id: &ActorId) -> Result<Option<Actor>, VigilError>;

    /// Create the actor if absent (streak starting now, best 0), refreshing
    /// the display name either way. Returns the stored record.
    async fn upsert_actor(
        &self,
        id: &ActorId,
        display_name: Option<&str>,
    ) -> Result<Actor, VigilError>;

    /// Replace the actor's wizard state wholesale.
    async fn set_wizard_state(&self, id: &ActorId, state: &WizardState) -> Result<(), VigilError>;

    /// Apply a planned relapse as one atomic unit: ratchet best-streak,
    /// append the history record, reset streak-start.
    async fn apply_relapse(&self, id: &ActorId, update: &RelapseUpdate)
    -> Result<(), VigilError>;

    /// The actor's append-only relapse history, oldest first.
    async fn relapse_history(&self, id: &ActorId) -> Result<Vec<RelapseRecord>, VigilError>;

    /// The `n` actors with the oldest streak-start, ascending (stable tie
    /// order). Elapsed-day annotation is the caller's job.
    async fn oldest_streaks(&self, n: i64) -> Result<Vec<Actor>, VigilError>;

    /// Total number of known actors.
    async fn actor_count(&self) -> Result<i64, VigilError>;

    // --- Dedup ledger ---

    /// Record an event id in the dedup ledger, purging entries older than
    /// `retention` in the same call.
    ///
    /// A second insert of the same id within the retention window fails with
    /// [`VigilError::DuplicateEvent`], distinguishable from all other
    /// storage failures.
    async fn note_event(&self, id: &EventId, retention: Duration) -> Result<(), VigilError>;

    // --- Configuration entries ---

    /// Read one configuration entry; `None` when never written.
    async fn get_entry(&self, key: ConfigKey) -> Result<Option<serde_json::Value>, VigilError>;

    /// Upsert one configuration entry, replacing any previous value wholesale.
    async fn put_entry(&self, key: ConfigKey, value: &serde_json::Value)
    -> Result<(), VigilError>;

    // --- Channel links ---

    async fn create_channel(&self, name: &str, link: &str) -> Result<ChannelLink, VigilError>;

    async fn list_channels(&self) -> Result<Vec<ChannelLink>, VigilError>;

    /// Delete by id; [`VigilError::NotFound`] when absent.
    async fn delete_channel(&self, id: i64) -> Result<(), VigilError>;

    // --- Custom replies ---

    /// Create a reply under a unique label. A label collision fails with
    /// [`VigilError::Validation`]; existing content is never overwritten.
    async fn create_reply(&self, reply: &CustomReply) -> Result<(), VigilError>;

    async fn find_reply(&self, label: &str) -> Result<Option<CustomReply>, VigilError>;

    async fn list_replies(&self) -> Result<Vec<CustomReply>, VigilError>;

    /// Delete by label; [`VigilError::NotFound`] when absent.
    async fn delete_reply(&self, label: &str) -> Result<(), VigilError>;

    // --- Motivations ---

    async fn add_motivation(&self, text: &str) -> Result<(), VigilError>;

    /// One uniformly random motivation, or `None` when the collection is empty.
    async fn random_motivation(&self) -> Result<Option<Motivation>, VigilError>;

    async fn motivation_count(&self) -> Result<i64, VigilError>;
}
