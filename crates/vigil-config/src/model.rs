// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Vigil streak bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Vigil configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VigilConfig {
    /// Process identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Administrator allow-list.
    #[serde(default)]
    pub admin: AdminConfig,

    /// Event dispatcher settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Webhook gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot process.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "vigil".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Administrator allow-list configuration.
///
/// Supplied once at startup and immutable for the process lifetime. An empty
/// list means no identity may enter the admin wizard.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    /// Actor identities permitted to use admin actions.
    #[serde(default)]
    pub allow_list: Vec<String>,
}

/// Event dispatcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Inner processing budget in milliseconds. Must sit below the
    /// platform's webhook timeout with slack for network and runtime.
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,

    /// How long processed event ids are retained for duplicate suppression.
    /// Must cover the platform's redelivery horizon.
    #[serde(default = "default_dedup_retention_secs")]
    pub dedup_retention_secs: i64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            deadline_ms: default_deadline_ms(),
            dedup_retention_secs: default_dedup_retention_secs(),
        }
    }
}

fn default_deadline_ms() -> u64 {
    4500
}

fn default_dedup_retention_secs() -> i64 {
    3600
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "vigil.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Webhook gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bearer token required on event posts. `None` disables auth.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            bearer_token: None,
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8081
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = VigilConfig::default();
        assert_eq!(config.agent.name, "vigil");
        assert_eq!(config.agent.log_level, "info");
        assert!(config.admin.allow_list.is_empty());
        assert_eq!(config.dispatch.deadline_ms, 4500);
        assert_eq!(config.dispatch.dedup_retention_secs, 3600);
        assert_eq!(config.storage.database_path, "vigil.db");
        assert!(config.storage.wal_mode);
        assert_eq!(config.gateway.port, 8081);
        assert!(config.gateway.bearer_token.is_none());
    }

    #[test]
    fn config_serializes_round_trip() {
        let config = VigilConfig::default();
        let toml_str = toml::to_string(&config).expect("should serialize");
        let parsed: VigilConfig = toml::from_str(&toml_str).expect("should deserialize");
        assert_eq!(parsed.agent.name, config.agent.name);
        assert_eq!(parsed.dispatch.deadline_ms, config.dispatch.deadline_ms);
    }
}
