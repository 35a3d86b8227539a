// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration entry upsert/read.
//!
//! Values are stored as JSON text; writes replace the previous value
//! wholesale (no merge).

use rusqlite::params;
use vigil_core::VigilError;
use vigil_core::types::ConfigKey;

use crate::database::{Database, map_tr_err};

/// Read one entry's value, or `None` when never written.
pub async fn get_entry(
    db: &Database,
    key: ConfigKey,
) -> Result<Option<serde_json::Value>, VigilError> {
    let key = key.to_string();
    let raw = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare("SELECT value FROM config_entries WHERE key = ?1")?;
            match stmt.query_row(params![key], |row| row.get::<_, String>(0)) {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)?;

    match raw {
        Some(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| VigilError::Storage {
                source: Box::new(e),
            }),
        None => Ok(None),
    }
}

/// Upsert one entry.
pub async fn put_entry(
    db: &Database,
    key: ConfigKey,
    value: &serde_json::Value,
) -> Result<(), VigilError> {
    let key = key.to_string();
    let text = value.to_string();

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO config_entries (key, value) VALUES (?1, ?2)
                 ON CONFLICT (key) DO UPDATE SET value = excluded.value",
                params![key, text],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
