// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vigil doctor` command implementation.
//!
//! Runs diagnostic checks against the configured environment to surface
//! storage and configuration problems before `serve` is started.

use std::time::Instant;

use vigil_config::model::VigilConfig;
use vigil_core::types::HealthStatus;
use vigil_core::{SessionStore, VigilError};
use vigil_storage::SqliteStore;

/// Status of a diagnostic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl CheckStatus {
    fn symbol(self) -> &'static str {
        match self {
            CheckStatus::Pass => "✓",
            CheckStatus::Warn => "!",
            CheckStatus::Fail => "✗",
        }
    }
}

/// Result of a single diagnostic check.
struct CheckResult {
    name: &'static str,
    status: CheckStatus,
    message: String,
}

/// Run the doctor command. Exits non-zero via the caller when any check fails.
pub async fn run_doctor(config: &VigilConfig) -> Result<(), VigilError> {
    let started = Instant::now();
    let mut results = Vec::new();

    results.push(check_admins(config));
    results.push(check_storage(config).await);
    results.push(check_gateway(config));

    let mut failed = false;
    for result in &results {
        println!("{} {}: {}", result.status.symbol(), result.name, result.message);
        failed |= result.status == CheckStatus::Fail;
    }
    println!(
        "{} checks in {:.1}s",
        results.len(),
        started.elapsed().as_secs_f64()
    );

    if failed {
        return Err(VigilError::Config("doctor checks failed".to_string()));
    }
    Ok(())
}

fn check_admins(config: &VigilConfig) -> CheckResult {
    if config.admin.allow_list.is_empty() {
        CheckResult {
            name: "admins",
            status: CheckStatus::Warn,
            message: "allow-list is empty; nobody can configure content".to_string(),
        }
    } else {
        CheckResult {
            name: "admins",
            status: CheckStatus::Pass,
            message: format!("{} administrator(s) configured", config.admin.allow_list.len()),
        }
    }
}

async fn check_storage(config: &VigilConfig) -> CheckResult {
    let store = SqliteStore::new(config.storage.clone());
    let outcome = async {
        store.initialize().await?;
        let status = store.health_check().await?;
        store.close().await?;
        Ok::<HealthStatus, VigilError>(status)
    }
    .await;

    match outcome {
        Ok(HealthStatus::Healthy) => CheckResult {
            name: "storage",
            status: CheckStatus::Pass,
            message: format!("{} opens and answers", config.storage.database_path),
        },
        Ok(status) => CheckResult {
            name: "storage",
            status: CheckStatus::Warn,
            message: format!("{status:?}"),
        },
        Err(e) => CheckResult {
            name: "storage",
            status: CheckStatus::Fail,
            message: e.to_string(),
        },
    }
}

fn check_gateway(config: &VigilConfig) -> CheckResult {
    // Validation already vetted the host; report the effective bind target
    // and whether the event route is guarded.
    let guard = if config.gateway.bearer_token.is_some() {
        "bearer auth"
    } else {
        "open route"
    };
    CheckResult {
        name: "gateway",
        status: CheckStatus::Pass,
        message: format!("{}:{} ({guard})", config.gateway.host, config.gateway.port),
    }
}
