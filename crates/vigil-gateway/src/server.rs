// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state. The server exposes exactly
//! two endpoints: an unauthenticated liveness probe and the event intake.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use vigil_core::VigilError;
use vigil_dispatch::Dispatcher;

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The dispatcher every accepted event is handed to.
    pub dispatcher: Arc<Dispatcher>,
}

/// Gateway server configuration (mirrors `GatewayConfig` from vigil-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Bearer token for event posts (None = open route).
    pub bearer_token: Option<String>,
}

/// Build the gateway router.
///
/// - `GET /health` -- public liveness probe
/// - `POST /events` -- event intake, bearer-guarded when configured
pub fn router(state: GatewayState, auth: AuthConfig) -> Router {
    let public_routes = Router::new().route("/health", get(handlers::get_health));

    let event_routes = Router::new()
        .route("/events", post(handlers::post_events))
        .route_layer(axum_middleware::from_fn_with_state(auth, auth_middleware))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(event_routes)
        .layer(TraceLayer::new_for_http())
}

/// Start the gateway HTTP server and serve until the process exits.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), VigilError> {
    let auth = AuthConfig {
        bearer_token: config.bearer_token.clone(),
    };
    let app = router(state, auth);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| VigilError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| VigilError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
