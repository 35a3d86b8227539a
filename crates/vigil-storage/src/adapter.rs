// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`SessionStore`] trait.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::OnceCell;
use tracing::debug;

use vigil_config::model::StorageConfig;
use vigil_core::types::{
    Actor, ActorId, ChannelLink, ConfigKey, CustomReply, EventId, HealthStatus, Motivation,
    RelapseRecord, RelapseUpdate, WizardState,
};
use vigil_core::{SessionStore, VigilError};

use crate::database::Database;
use crate::queries;

/// SQLite-backed session store.
///
/// Wraps a [`Database`] handle and delegates all operations to the typed
/// query modules. The database is lazily initialized on the first call to
/// [`SessionStore::initialize`] and safe to share behind an `Arc` for the
/// process lifetime.
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new store with the given configuration.
    ///
    /// The database connection is not opened until `initialize` is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, VigilError> {
        self.db.get().ok_or_else(|| VigilError::Storage {
            source: "store not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl SessionStore for SqliteStore {
    async fn initialize(&self) -> Result<(), VigilError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| VigilError::Storage {
            source: "store already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), VigilError> {
        let db = self.db()?;
        db.close().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn health_check(&self) -> Result<HealthStatus, VigilError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    // --- Actors ---

    async fn find_actor(&self, id: &ActorId) -> Result<Option<Actor>, VigilError> {
        queries::actors::get_actor(self.db()?, id).await
    }

    async fn upsert_actor(
        &self,
        id: &ActorId,
        display_name: Option<&str>,
    ) -> Result<Actor, VigilError> {
        queries::actors::upsert_actor(self.db()?, id, display_name, Utc::now()).await
    }

    async fn set_wizard_state(&self, id: &ActorId, state: &WizardState) -> Result<(), VigilError> {
        queries::actors::set_wizard_state(self.db()?, id, state, Utc::now()).await
    }

    async fn apply_relapse(
        &self,
        id: &ActorId,
        update: &RelapseUpdate,
    ) -> Result<(), VigilError> {
        queries::actors::apply_relapse(self.db()?, id, update).await
    }

    async fn relapse_history(&self, id: &ActorId) -> Result<Vec<RelapseRecord>, VigilError> {
        queries::actors::relapse_history(self.db()?, id).await
    }

    async fn oldest_streaks(&self, n: i64) -> Result<Vec<Actor>, VigilError> {
        queries::actors::oldest_streaks(self.db()?, n).await
    }

    async fn actor_count(&self) -> Result<i64, VigilError> {
        queries::actors::actor_count(self.db()?).await
    }

    // --- Dedup ledger ---

    async fn note_event(&self, id: &EventId, retention: Duration) -> Result<(), VigilError> {
        queries::dedup::note_event(self.db()?, id, retention, Utc::now()).await
    }

    // --- Configuration entries ---

    async fn get_entry(&self, key: ConfigKey) -> Result<Option<serde_json::Value>, VigilError> {
        queries::entries::get_entry(self.db()?, key).await
    }

    async fn put_entry(
        &self,
        key: ConfigKey,
        value: &serde_json::Value,
    ) -> Result<(), VigilError> {
        queries::entries::put_entry(self.db()?, key, value).await
    }

    // --- Channel links ---

    async fn create_channel(&self, name: &str, link: &str) -> Result<ChannelLink, VigilError> {
        queries::content::create_channel(self.db()?, name, link).await
    }

    async fn list_channels(&self) -> Result<Vec<ChannelLink>, VigilError> {
        queries::content::list_channels(self.db()?).await
    }

    async fn delete_channel(&self, id: i64) -> Result<(), VigilError> {
        queries::content::delete_channel(self.db()?, id).await
    }

    // --- Custom replies ---

    async fn create_reply(&self, reply: &CustomReply) -> Result<(), VigilError> {
        queries::content::create_reply(self.db()?, reply).await
    }

    async fn find_reply(&self, label: &str) -> Result<Option<CustomReply>, VigilError> {
        queries::content::find_reply(self.db()?, label).await
    }

    async fn list_replies(&self) -> Result<Vec<CustomReply>, VigilError> {
        queries::content::list_replies(self.db()?).await
    }

    async fn delete_reply(&self, label: &str) -> Result<(), VigilError> {
        queries::content::delete_reply(self.db()?, label).await
    }

    // --- Motivations ---

    async fn add_motivation(&self, text: &str) -> Result<(), VigilError> {
        queries::content::add_motivation(self.db()?, text, Utc::now()).await
    }

    async fn random_motivation(&self) -> Result<Option<Motivation>, VigilError> {
        queries::content::random_motivation(self.db()?).await
    }

    async fn motivation_count(&self) -> Result<i64, VigilError> {
        queries::content::motivation_count(self.db()?).await
    }
}
