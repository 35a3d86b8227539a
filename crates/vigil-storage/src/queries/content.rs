// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content item queries: channel links, custom replies, motivations.

use chrono::{DateTime, Utc};
use rusqlite::{Row, params};
use vigil_core::VigilError;
use vigil_core::types::{ChannelLink, CustomReply, MediaKind, Motivation, ReplyContent};

use crate::database::{Database, fmt_ts, is_no_rows, is_unique_violation, map_tr_err, parse_ts};

// --- Channels ---

pub async fn create_channel(
    db: &Database,
    name: &str,
    link: &str,
) -> Result<ChannelLink, VigilError> {
    let name = name.to_string();
    let link = link.to_string();

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO channels (name, link) VALUES (?1, ?2)",
                params![name, link],
            )?;
            Ok(ChannelLink {
                id: conn.last_insert_rowid(),
                name,
                link,
            })
        })
        .await
        .map_err(map_tr_err)
}

pub async fn list_channels(db: &Database) -> Result<Vec<ChannelLink>, VigilError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare("SELECT id, name, link FROM channels ORDER BY id ASC")?;
            let rows = stmt.query_map([], |row| {
                Ok(ChannelLink {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    link: row.get(2)?,
                })
            })?;

            let mut channels = Vec::new();
            for row in rows {
                channels.push(row?);
            }
            Ok(channels)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a channel by id; missing rows surface as [`VigilError::NotFound`].
pub async fn delete_channel(db: &Database, id: i64) -> Result<(), VigilError> {
    db.connection()
        .call(move |conn| {
            let changed = conn.execute("DELETE FROM channels WHERE id = ?1", params![id])?;
            if changed == 0 {
                return Err(rusqlite::Error::QueryReturnedNoRows);
            }
            Ok(())
        })
        .await
        .map_err(|e| {
            if is_no_rows(&e) {
                VigilError::NotFound {
                    kind: "channel".into(),
                    key: id.to_string(),
                }
            } else {
                map_tr_err(e)
            }
        })
}

// --- Custom replies ---

fn reply_from_row(row: &Row<'_>) -> Result<CustomReply, rusqlite::Error> {
    let label: String = row.get(0)?;
    let kind_raw: String = row.get(1)?;
    let content: String = row.get(2)?;
    let caption: Option<String> = row.get(3)?;

    let content = if kind_raw == "text" {
        ReplyContent::Text(content)
    } else {
        let kind: MediaKind = kind_raw.parse().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                format!("unknown reply kind: {kind_raw}").into(),
            )
        })?;
        ReplyContent::Media {
            kind,
            file_ref: content,
            caption,
        }
    };

    Ok(CustomReply { label, content })
}

/// Create a reply under a unique label.
///
/// A label collision is mapped to [`VigilError::Validation`]: existing admin
/// content is never silently overwritten.
pub async fn create_reply(db: &Database, reply: &CustomReply) -> Result<(), VigilError> {
    let label = reply.label.clone();
    let label_for_err = reply.label.clone();
    let (kind, content, caption) = match &reply.content {
        ReplyContent::Text(text) => ("text".to_string(), text.clone(), None),
        ReplyContent::Media {
            kind,
            file_ref,
            caption,
        } => (kind.to_string(), file_ref.clone(), caption.clone()),
    };

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO custom_replies (label, kind, content, caption)
                 VALUES (?1, ?2, ?3, ?4)",
                params![label, kind, content, caption],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                VigilError::Validation(format!("a reply labeled `{label_for_err}` already exists"))
            } else {
                map_tr_err(e)
            }
        })
}

pub async fn find_reply(db: &Database, label: &str) -> Result<Option<CustomReply>, VigilError> {
    let label = label.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT label, kind, content, caption FROM custom_replies WHERE label = ?1",
            )?;
            match stmt.query_row(params![label], reply_from_row) {
                Ok(reply) => Ok(Some(reply)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

pub async fn list_replies(db: &Database) -> Result<Vec<CustomReply>, VigilError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT label, kind, content, caption FROM custom_replies ORDER BY label ASC",
            )?;
            let rows = stmt.query_map([], reply_from_row)?;

            let mut replies = Vec::new();
            for row in rows {
                replies.push(row?);
            }
            Ok(replies)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a reply by label; missing rows surface as [`VigilError::NotFound`].
pub async fn delete_reply(db: &Database, label: &str) -> Result<(), VigilError> {
    let label = label.to_string();
    let label_for_err = label.clone();

    db.connection()
        .call(move |conn| {
            let changed =
                conn.execute("DELETE FROM custom_replies WHERE label = ?1", params![label])?;
            if changed == 0 {
                return Err(rusqlite::Error::QueryReturnedNoRows);
            }
            Ok(())
        })
        .await
        .map_err(|e| {
            if is_no_rows(&e) {
                VigilError::NotFound {
                    kind: "reply".into(),
                    key: label_for_err,
                }
            } else {
                map_tr_err(e)
            }
        })
}

// --- Motivations ---

pub async fn add_motivation(
    db: &Database,
    text: &str,
    now: DateTime<Utc>,
) -> Result<(), VigilError> {
    let text = text.to_string();
    let ts = fmt_ts(now);

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO motivations (text, added_at) VALUES (?1, ?2)",
                params![text, ts],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// One uniformly random motivation, or `None` when the collection is empty.
pub async fn random_motivation(db: &Database) -> Result<Option<Motivation>, VigilError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, text, added_at FROM motivations ORDER BY RANDOM() LIMIT 1",
            )?;
            let result = stmt.query_row([], |row| {
                let added_raw: String = row.get(2)?;
                Ok(Motivation {
                    id: row.get(0)?,
                    text: row.get(1)?,
                    added_at: parse_ts(2, &added_raw)?,
                })
            });
            match result {
                Ok(motivation) => Ok(Some(motivation)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

pub async fn motivation_count(db: &Database) -> Result<i64, VigilError> {
    db.connection()
        .call(|conn| {
            let n = conn.query_row("SELECT COUNT(*) FROM motivations", [], |row| row.get(0))?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)
}
