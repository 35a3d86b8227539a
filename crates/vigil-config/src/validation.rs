// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as positive deadlines and a bindable gateway host.

use crate::diagnostic::ConfigError;
use crate::model::VigilConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &VigilConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.agent.log_level
            ),
        });
    }

    if config.dispatch.deadline_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "dispatch.deadline_ms must be positive".to_string(),
        });
    }

    if config.dispatch.dedup_retention_secs <= 0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "dispatch.dedup_retention_secs must be positive, got {}",
                config.dispatch.dedup_retention_secs
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    for id in &config.admin.allow_list {
        if id.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "admin.allow_list entries must not be empty".to_string(),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
