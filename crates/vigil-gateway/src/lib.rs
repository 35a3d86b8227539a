// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP webhook gateway for the Vigil streak bot.
//!
//! Receives platform events as JSON posts, normalizes them into domain
//! events at the boundary, and hands them to the dispatcher. The response is
//! always 200: the dispatcher's acknowledgment contract extends to the wire,
//! where any other status would trigger platform redelivery.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use server::{GatewayState, ServerConfig, router, start_server};
