// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trigger label resolution and keyboard composition.
//!
//! The three built-in triggers carry admin-renamable labels stored as
//! configuration entries; the defaults below apply until an admin renames
//! them. The admin panel label is fixed.

use vigil_core::types::ConfigKey;
use vigil_core::{SessionStore, VigilError};

pub const DEFAULT_URGE_LABEL: &str = "🆘 Help me";
pub const DEFAULT_STREAK_LABEL: &str = "📅 My streak";
pub const DEFAULT_CHANNEL_LABEL: &str = "📢 Channels";
pub const ADMIN_PANEL_LABEL: &str = "🔐 Admin panel";

/// The currently configured labels of the three built-in triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerLabels {
    pub urge: String,
    pub streak: String,
    pub channel: String,
}

/// Read a text entry, falling back to `default` when absent or non-text.
pub async fn text_entry(
    store: &dyn SessionStore,
    key: ConfigKey,
    default: &str,
) -> Result<String, VigilError> {
    let value = store.get_entry(key).await?;
    Ok(value
        .as_ref()
        .and_then(|v| v.as_str())
        .unwrap_or(default)
        .to_string())
}

/// Resolve all three trigger labels.
pub async fn trigger_labels(store: &dyn SessionStore) -> Result<TriggerLabels, VigilError> {
    Ok(TriggerLabels {
        urge: text_entry(store, ConfigKey::UrgeLabel, DEFAULT_URGE_LABEL).await?,
        streak: text_entry(store, ConfigKey::StreakLabel, DEFAULT_STREAK_LABEL).await?,
        channel: text_entry(store, ConfigKey::ChannelLabel, DEFAULT_CHANNEL_LABEL).await?,
    })
}

/// Compose the persistent keyboard for `/start`.
///
/// Starts from the configured layout (or a default grid of the three
/// trigger labels), appends custom reply labels not already present in rows
/// of two, and adds the admin panel row for administrators.
pub async fn compose_keyboard(
    store: &dyn SessionStore,
    labels: &TriggerLabels,
    is_admin: bool,
) -> Result<Vec<Vec<String>>, VigilError> {
    let mut layout: Vec<Vec<String>> = match store.get_entry(ConfigKey::KeyboardLayout).await? {
        Some(value) => serde_json::from_value(value).map_err(|e| VigilError::Storage {
            source: Box::new(e),
        })?,
        None => vec![
            vec![labels.urge.clone(), labels.streak.clone()],
            vec![labels.channel.clone()],
        ],
    };

    let existing: Vec<String> = layout.iter().flatten().cloned().collect();
    let mut pending_row = Vec::new();
    for reply in store.list_replies().await? {
        if existing.contains(&reply.label) {
            continue;
        }
        pending_row.push(reply.label);
        if pending_row.len() == 2 {
            layout.push(std::mem::take(&mut pending_row));
        }
    }
    if !pending_row.is_empty() {
        layout.push(pending_row);
    }

    if is_admin {
        layout.push(vec![ADMIN_PANEL_LABEL.to_string()]);
    }

    Ok(layout)
}
