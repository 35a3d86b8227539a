// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook request handlers and wire-event normalization.
//!
//! The wire shape carries optional `text`/`media`/`action` fields; they are
//! resolved into the closed [`EventKind`] sum type exactly once, here.
//! Downstream components never re-inspect optional fields.

use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use vigil_core::VigilError;
use vigil_core::types::{ActorId, EventId, EventKind, InboundEvent, MessagePayload};

use crate::server::GatewayState;

/// Wire shape of one inbound platform event.
#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub event_id: String,
    pub actor_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Message text, mutually exclusive with `media` and `action`.
    #[serde(default)]
    pub text: Option<String>,
    /// Media reference, with `caption` alongside.
    #[serde(default)]
    pub media: Option<MediaRef>,
    #[serde(default)]
    pub caption: Option<String>,
    /// Inline-action callback data.
    #[serde(default)]
    pub action: Option<String>,
}

/// Wire shape of a media reference.
#[derive(Debug, Deserialize)]
pub struct MediaRef {
    pub kind: String,
    pub file_ref: String,
}

/// Normalize a wire event into the domain event, deciding the payload sum
/// type once. Priority: action, then media, then text.
pub fn normalize(req: EventRequest) -> Result<InboundEvent, VigilError> {
    let kind = if let Some(action) = req.action {
        EventKind::Action(action.parse()?)
    } else if let Some(media) = req.media {
        let kind = media
            .kind
            .parse::<vigil_core::types::MediaKind>()
            .map_err(|_| VigilError::Validation(format!("unknown media kind: {}", media.kind)))?;
        let (file_ref, caption) = (media.file_ref, req.caption);
        EventKind::Message(match kind {
            vigil_core::types::MediaKind::Image => MessagePayload::Image { file_ref, caption },
            vigil_core::types::MediaKind::Video => MessagePayload::Video { file_ref, caption },
            vigil_core::types::MediaKind::Audio => MessagePayload::Audio { file_ref, caption },
        })
    } else if let Some(text) = req.text {
        EventKind::Message(MessagePayload::Text(text))
    } else {
        return Err(VigilError::Validation(
            "event carries neither text, media, nor action".to_string(),
        ));
    };

    Ok(InboundEvent {
        event_id: EventId(req.event_id),
        actor_id: ActorId(req.actor_id),
        display_name: req.display_name,
        kind,
    })
}

/// `POST /events`: accept one event and acknowledge unconditionally.
///
/// Malformed bodies are logged and dropped with a 200 as well -- a non-2xx
/// answer would only make the platform redeliver the same garbage.
pub async fn post_events(
    State(state): State<GatewayState>,
    body: String,
) -> (StatusCode, &'static str) {
    let request: EventRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "dropping malformed event body");
            return (StatusCode::OK, "OK");
        }
    };

    let event = match normalize(request) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "dropping unnormalizable event");
            return (StatusCode::OK, "OK");
        }
    };

    let ack = state.dispatcher.handle(&event).await;
    debug!(event_id = %event.event_id, disposition = %ack.disposition, "event acknowledged");
    (StatusCode::OK, "OK")
}

/// `GET /health`: liveness probe for the platform and process supervisors.
pub async fn get_health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "Active")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::types::ActionCommand;

    fn request(json: &str) -> EventRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn text_events_normalize_to_text_payload() {
        let event = normalize(request(
            r#"{"event_id": "e-1", "actor_id": "u-1", "display_name": "Sam", "text": "/start"}"#,
        ))
        .unwrap();

        assert_eq!(event.event_id, EventId("e-1".into()));
        assert_eq!(
            event.kind,
            EventKind::Message(MessagePayload::Text("/start".into()))
        );
    }

    #[test]
    fn media_events_normalize_by_declared_kind() {
        let event = normalize(request(
            r#"{"event_id": "e-2", "actor_id": "u-1",
                "media": {"kind": "video", "file_ref": "file-9"}, "caption": "Watch"}"#,
        ))
        .unwrap();

        assert_eq!(
            event.kind,
            EventKind::Message(MessagePayload::Video {
                file_ref: "file-9".into(),
                caption: Some("Watch".into()),
            })
        );
    }

    #[test]
    fn action_events_win_over_text() {
        let event = normalize(request(
            r#"{"event_id": "e-3", "actor_id": "u-1", "text": "ignored", "action": "adm"}"#,
        ))
        .unwrap();

        assert_eq!(event.kind, EventKind::Action(ActionCommand::AdminMenu));
    }

    #[test]
    fn payloadless_events_are_rejected() {
        let err = normalize(request(r#"{"event_id": "e-4", "actor_id": "u-1"}"#)).unwrap_err();
        assert!(matches!(err, VigilError::Validation(_)));
    }

    #[test]
    fn unknown_media_kind_is_rejected() {
        let err = normalize(request(
            r#"{"event_id": "e-5", "actor_id": "u-1",
                "media": {"kind": "sticker", "file_ref": "f"}}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, VigilError::Validation(_)));
    }
}
