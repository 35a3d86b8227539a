// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound event builders for tests.

use vigil_core::types::{
    ActionCommand, ActorId, EventId, EventKind, InboundEvent, MediaKind, MessagePayload,
};

/// A text message event.
pub fn text_event(event_id: &str, actor_id: &str, text: &str) -> InboundEvent {
    InboundEvent {
        event_id: EventId(event_id.to_string()),
        actor_id: ActorId(actor_id.to_string()),
        display_name: None,
        kind: EventKind::Message(MessagePayload::Text(text.to_string())),
    }
}

/// A media message event.
pub fn media_event(
    event_id: &str,
    actor_id: &str,
    kind: MediaKind,
    file_ref: &str,
    caption: Option<&str>,
) -> InboundEvent {
    let file_ref = file_ref.to_string();
    let caption = caption.map(String::from);
    let payload = match kind {
        MediaKind::Image => MessagePayload::Image { file_ref, caption },
        MediaKind::Video => MessagePayload::Video { file_ref, caption },
        MediaKind::Audio => MessagePayload::Audio { file_ref, caption },
    };
    InboundEvent {
        event_id: EventId(event_id.to_string()),
        actor_id: ActorId(actor_id.to_string()),
        display_name: None,
        kind: EventKind::Message(payload),
    }
}

/// An inline-action event.
pub fn action_event(event_id: &str, actor_id: &str, command: ActionCommand) -> InboundEvent {
    InboundEvent {
        event_id: EventId(event_id.to_string()),
        actor_id: ActorId(actor_id.to_string()),
        display_name: None,
        kind: EventKind::Action(command),
    }
}
