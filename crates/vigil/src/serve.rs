// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vigil serve` command implementation.
//!
//! Opens the session store, wires the dispatcher to the intent stream, and
//! runs the webhook gateway until the process exits.

use std::sync::Arc;

use tracing::{debug, info};

use vigil_config::model::VigilConfig;
use vigil_core::{SessionStore, VigilError};
use vigil_dispatch::{ChannelSink, Dispatcher};
use vigil_gateway::{GatewayState, ServerConfig};
use vigil_storage::SqliteStore;

/// Run the serve command.
pub async fn run_serve(config: VigilConfig) -> Result<(), VigilError> {
    let store = Arc::new(SqliteStore::new(config.storage.clone()));
    store.initialize().await?;
    info!(path = %config.storage.database_path, "session store ready");

    let (sink, mut outgoing) = ChannelSink::new(256);

    // The transport adapter consumes this stream. Without one attached,
    // intents are logged at debug and dropped.
    tokio::spawn(async move {
        while let Some(reply) = outgoing.recv().await {
            debug!(recipient = %reply.recipient, intent = ?reply.intent, "outgoing intent");
        }
    });

    let dispatcher = Arc::new(Dispatcher::new(store.clone(), Arc::new(sink), &config));

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
        bearer_token: config.gateway.bearer_token.clone(),
    };

    info!(
        admins = config.admin.allow_list.len(),
        deadline_ms = config.dispatch.deadline_ms,
        "dispatcher ready"
    );
    vigil_gateway::start_server(&server_config, GatewayState { dispatcher }).await
}
