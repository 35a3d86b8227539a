// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline testing.
//!
//! `TestHarness` assembles a dispatcher over a temp-file SQLite store and a
//! channel sink, so tests can drive the full
//! event -> dedup -> route -> persist -> intent pipeline without any
//! external service.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use vigil_config::model::VigilConfig;
use vigil_core::types::{Ack, InboundEvent};
use vigil_core::{SessionStore, VigilError};
use vigil_dispatch::{ChannelSink, Dispatcher, OutgoingReply};
use vigil_storage::SqliteStore;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    admins: Vec<String>,
    deadline_ms: u64,
    dedup_retention_secs: i64,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        let defaults = VigilConfig::default();
        Self {
            admins: Vec::new(),
            deadline_ms: defaults.dispatch.deadline_ms,
            dedup_retention_secs: defaults.dispatch.dedup_retention_secs,
        }
    }

    /// Add actor ids to the administrator allow-list.
    pub fn with_admins<I, S>(mut self, admins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.admins.extend(admins.into_iter().map(Into::into));
        self
    }

    /// Override the processing deadline.
    pub fn with_deadline_ms(mut self, deadline_ms: u64) -> Self {
        self.deadline_ms = deadline_ms;
        self
    }

    /// Override the dedup retention window.
    pub fn with_retention_secs(mut self, secs: i64) -> Self {
        self.dedup_retention_secs = secs;
        self
    }

    /// Build the harness, creating the temp store and the dispatcher.
    pub async fn build(self) -> Result<TestHarness, VigilError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| VigilError::Storage {
            source: Box::new(e),
        })?;

        let mut config = VigilConfig::default();
        config.admin.allow_list = self.admins;
        config.dispatch.deadline_ms = self.deadline_ms;
        config.dispatch.dedup_retention_secs = self.dedup_retention_secs;
        config.storage.database_path = temp_dir
            .path()
            .join("harness.db")
            .to_string_lossy()
            .into_owned();

        let store = Arc::new(SqliteStore::new(config.storage.clone()));
        store.initialize().await?;

        let (sink, rx) = ChannelSink::new(256);
        let dispatcher = Dispatcher::new(store.clone(), Arc::new(sink), &config);

        Ok(TestHarness {
            store,
            dispatcher,
            outgoing: Mutex::new(rx),
            _temp_dir: temp_dir,
        })
    }
}

/// A complete dispatcher stack over temp storage, plus the intent stream.
pub struct TestHarness {
    store: Arc<SqliteStore>,
    dispatcher: Dispatcher,
    outgoing: Mutex<mpsc::Receiver<OutgoingReply>>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Drive one event through the full pipeline.
    pub async fn send(&self, event: &InboundEvent) -> Ack {
        self.dispatcher.handle(event).await
    }

    /// Direct store access for seeding and assertions.
    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    /// Drain every intent delivered so far.
    pub async fn outgoing(&self) -> Vec<OutgoingReply> {
        let mut rx = self.outgoing.lock().await;
        let mut replies = Vec::new();
        while let Ok(reply) = rx.try_recv() {
            replies.push(reply);
        }
        replies
    }
}
