// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The admin wizard transition table.
//!
//! `advance` is pure: it maps (current step, pending fields, payload) to a
//! declarative effect, the next state, and a reply prompt. The dispatcher
//! persists the state and applies the effect; the wizard never touches the
//! store or the transport, and never re-derives authorization.

use vigil_core::types::{
    ConfigKey, MessagePayload, PendingFields, RenameTarget, ReplyContent, WizardEntry,
    WizardState, WizardStep,
};

use crate::layout::parse_layout;

/// Literal token that aborts any active flow, checked before all step logic.
pub const CANCEL_TOKEN: &str = "/cancel";

/// A persisted mutation requested by a completed wizard step.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEffect {
    /// Upsert one configuration entry, replacing the value wholesale.
    SetEntry {
        key: ConfigKey,
        value: serde_json::Value,
    },
    CreateChannel {
        name: String,
        link: String,
    },
    CreateReply {
        label: String,
        content: ReplyContent,
    },
    AddMotivation {
        text: String,
    },
}

/// The result of one wizard transition.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardOutcome {
    pub effect: Option<WizardEffect>,
    pub next: WizardState,
    pub reply: String,
}

/// Start a wizard flow: the initial step plus its opening prompt.
pub fn begin(entry: WizardEntry) -> (WizardState, String) {
    let (step, prompt) = match entry {
        WizardEntry::Motivation => (
            WizardStep::AwaitingMotivationText,
            "Send the motivation text:",
        ),
        WizardEntry::Layout => (
            WizardStep::AwaitingLayoutSpec,
            "Send the keyboard layout. One row per line, labels separated by commas:",
        ),
        WizardEntry::Welcome => (
            WizardStep::AwaitingWelcomeText,
            "Send the new welcome message:",
        ),
        WizardEntry::Rename(target) => (
            WizardStep::AwaitingLabelRename(target),
            "Send the new label:",
        ),
        WizardEntry::AddChannel => (WizardStep::AwaitingChannelName, "Send the channel name:"),
        WizardEntry::AddReply => (WizardStep::AwaitingButtonLabel, "Send the button label:"),
    };
    (WizardState::at(step), prompt.to_string())
}

/// Interpret `payload` as the answer to the pending question at `step`.
pub fn advance(
    step: &WizardStep,
    pending: &PendingFields,
    payload: &MessagePayload,
) -> WizardOutcome {
    // Cancellation wins over everything, from any depth of a flow.
    if payload.text().map(str::trim) == Some(CANCEL_TOKEN) {
        return WizardOutcome {
            effect: None,
            next: WizardState::default(),
            reply: "Cancelled.".to_string(),
        };
    }

    match step {
        WizardStep::AwaitingWelcomeText => {
            let Some(text) = required_text(payload) else {
                return stay(step, pending, "Send the welcome message as text:");
            };
            complete(
                WizardEffect::SetEntry {
                    key: ConfigKey::WelcomeMessage,
                    value: serde_json::Value::String(text),
                },
                "Welcome message saved. Send /start to see it.",
            )
        }

        WizardStep::AwaitingLayoutSpec => {
            let Some(text) = required_text(payload) else {
                return stay(step, pending, "Send the layout as text:");
            };
            let grid = parse_layout(&text);
            complete(
                WizardEffect::SetEntry {
                    key: ConfigKey::KeyboardLayout,
                    value: serde_json::json!(grid),
                },
                "Layout saved. Send /start to preview it.",
            )
        }

        WizardStep::AwaitingLabelRename(target) => {
            let Some(text) = required_text(payload) else {
                return stay(step, pending, "Send the new label as text:");
            };
            let key = match target {
                RenameTarget::Urge => ConfigKey::UrgeLabel,
                RenameTarget::Streak => ConfigKey::StreakLabel,
            };
            complete(
                WizardEffect::SetEntry {
                    key,
                    value: serde_json::Value::String(text),
                },
                "Label saved. Send /start to refresh the keyboard.",
            )
        }

        WizardStep::AwaitingChannelName => {
            let Some(text) = required_text(payload) else {
                return stay(step, pending, "Send the channel name as text:");
            };
            WizardOutcome {
                effect: None,
                next: WizardState {
                    step: Some(WizardStep::AwaitingChannelLink),
                    pending: PendingFields {
                        channel_name: Some(text),
                        reply_label: None,
                    },
                },
                reply: "Send the channel link:".to_string(),
            }
        }

        WizardStep::AwaitingChannelLink => {
            let Some(link) = required_text(payload) else {
                return stay(step, pending, "Send the channel link as text:");
            };
            match &pending.channel_name {
                Some(name) => complete(
                    WizardEffect::CreateChannel {
                        name: name.clone(),
                        link,
                    },
                    "Channel added.",
                ),
                // The name was lost (out-of-band reset); abandon the flow.
                None => abandon("The channel name is missing. Start the flow again."),
            }
        }

        WizardStep::AwaitingButtonLabel => {
            let Some(text) = required_text(payload) else {
                return stay(step, pending, "Send the button label as text:");
            };
            WizardOutcome {
                effect: None,
                next: WizardState {
                    step: Some(WizardStep::AwaitingButtonContent),
                    pending: PendingFields {
                        channel_name: None,
                        reply_label: Some(text),
                    },
                },
                reply: "Send the button content: text, photo, video, or voice.".to_string(),
            }
        }

        WizardStep::AwaitingButtonContent => {
            let Some(label) = pending.reply_label.clone() else {
                return abandon("The button label is missing. Start the flow again.");
            };
            use vigil_core::types::MediaKind;
            let media = |kind: MediaKind, file_ref: &str, caption: &Option<String>| {
                ReplyContent::Media {
                    kind,
                    file_ref: file_ref.to_string(),
                    caption: caption.clone(),
                }
            };
            let content = match payload {
                MessagePayload::Text(text) if !text.trim().is_empty() => {
                    ReplyContent::Text(text.trim().to_string())
                }
                MessagePayload::Image { file_ref, caption } => {
                    media(MediaKind::Image, file_ref, caption)
                }
                MessagePayload::Video { file_ref, caption } => {
                    media(MediaKind::Video, file_ref, caption)
                }
                MessagePayload::Audio { file_ref, caption } => {
                    media(MediaKind::Audio, file_ref, caption)
                }
                // Neither text nor media: reject without advancing.
                MessagePayload::Text(_) => {
                    return stay(
                        step,
                        pending,
                        "The button needs content. Send text, a photo, a video, or a voice note.",
                    );
                }
            };
            complete(WizardEffect::CreateReply { label, content }, "Button created.")
        }

        WizardStep::AwaitingMotivationText => {
            let Some(text) = required_text(payload) else {
                return stay(step, pending, "Send the motivation as text:");
            };
            complete(WizardEffect::AddMotivation { text }, "Motivation added.")
        }
    }
}

/// Trimmed non-empty text, when the payload carries any.
fn required_text(payload: &MessagePayload) -> Option<String> {
    payload
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

/// Validation re-prompt: same step, same pending fields, no effect.
fn stay(step: &WizardStep, pending: &PendingFields, reply: &str) -> WizardOutcome {
    WizardOutcome {
        effect: None,
        next: WizardState {
            step: Some(step.clone()),
            pending: pending.clone(),
        },
        reply: reply.to_string(),
    }
}

/// Terminal transition: emit the effect and return to none.
fn complete(effect: WizardEffect, reply: &str) -> WizardOutcome {
    WizardOutcome {
        effect: Some(effect),
        next: WizardState::default(),
        reply: reply.to_string(),
    }
}

/// Terminal transition without an effect (the flow lost a prerequisite).
fn abandon(reply: &str) -> WizardOutcome {
    WizardOutcome {
        effect: None,
        next: WizardState::default(),
        reply: reply.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::types::MediaKind;

    fn text(s: &str) -> MessagePayload {
        MessagePayload::Text(s.to_string())
    }

    fn all_steps() -> Vec<WizardStep> {
        vec![
            WizardStep::AwaitingWelcomeText,
            WizardStep::AwaitingLayoutSpec,
            WizardStep::AwaitingLabelRename(RenameTarget::Urge),
            WizardStep::AwaitingLabelRename(RenameTarget::Streak),
            WizardStep::AwaitingChannelName,
            WizardStep::AwaitingChannelLink,
            WizardStep::AwaitingButtonLabel,
            WizardStep::AwaitingButtonContent,
            WizardStep::AwaitingMotivationText,
        ]
    }

    #[test]
    fn cancel_token_aborts_every_state_and_clears_pending() {
        let pending = PendingFields {
            channel_name: Some("Updates".into()),
            reply_label: Some("Tips".into()),
        };

        for step in all_steps() {
            let outcome = advance(&step, &pending, &text(" /cancel "));
            assert!(outcome.effect.is_none(), "no effect expected for {step}");
            assert_eq!(outcome.next, WizardState::default());
        }
    }

    #[test]
    fn channel_flow_is_a_two_step_capture() {
        let first = advance(
            &WizardStep::AwaitingChannelName,
            &PendingFields::default(),
            &text("Updates"),
        );
        assert!(first.effect.is_none());
        assert_eq!(first.next.step, Some(WizardStep::AwaitingChannelLink));
        assert_eq!(first.next.pending.channel_name.as_deref(), Some("Updates"));

        let second = advance(
            &WizardStep::AwaitingChannelLink,
            &first.next.pending,
            &text("https://example.test/updates"),
        );
        assert_eq!(
            second.effect,
            Some(WizardEffect::CreateChannel {
                name: "Updates".into(),
                link: "https://example.test/updates".into(),
            })
        );
        assert_eq!(second.next, WizardState::default());
    }

    #[test]
    fn button_flow_accepts_text_content() {
        let first = advance(
            &WizardStep::AwaitingButtonLabel,
            &PendingFields::default(),
            &text("Daily tips"),
        );
        assert_eq!(first.next.step, Some(WizardStep::AwaitingButtonContent));

        let second = advance(
            &WizardStep::AwaitingButtonContent,
            &first.next.pending,
            &text("Drink water."),
        );
        assert_eq!(
            second.effect,
            Some(WizardEffect::CreateReply {
                label: "Daily tips".into(),
                content: ReplyContent::Text("Drink water.".into()),
            })
        );
        assert_eq!(second.next, WizardState::default());
    }

    #[test]
    fn button_flow_accepts_media_content() {
        let pending = PendingFields {
            channel_name: None,
            reply_label: Some("Intro".into()),
        };
        let payload = MessagePayload::Video {
            file_ref: "file-9".into(),
            caption: Some("Watch first".into()),
        };

        let outcome = advance(&WizardStep::AwaitingButtonContent, &pending, &payload);
        assert_eq!(
            outcome.effect,
            Some(WizardEffect::CreateReply {
                label: "Intro".into(),
                content: ReplyContent::Media {
                    kind: MediaKind::Video,
                    file_ref: "file-9".into(),
                    caption: Some("Watch first".into()),
                },
            })
        );
    }

    #[test]
    fn empty_button_content_does_not_advance() {
        let pending = PendingFields {
            channel_name: None,
            reply_label: Some("Intro".into()),
        };

        let outcome = advance(&WizardStep::AwaitingButtonContent, &pending, &text("   "));
        assert!(outcome.effect.is_none());
        assert_eq!(outcome.next.step, Some(WizardStep::AwaitingButtonContent));
        // The captured label survives the re-prompt.
        assert_eq!(outcome.next.pending.reply_label.as_deref(), Some("Intro"));
    }

    #[test]
    fn media_in_a_text_only_state_reprompts_without_advancing() {
        let payload = MessagePayload::Image {
            file_ref: "file-1".into(),
            caption: None,
        };
        let outcome = advance(
            &WizardStep::AwaitingWelcomeText,
            &PendingFields::default(),
            &payload,
        );
        assert!(outcome.effect.is_none());
        assert_eq!(outcome.next.step, Some(WizardStep::AwaitingWelcomeText));
    }

    #[test]
    fn rename_targets_map_to_their_config_keys() {
        for (target, key) in [
            (RenameTarget::Urge, ConfigKey::UrgeLabel),
            (RenameTarget::Streak, ConfigKey::StreakLabel),
        ] {
            let outcome = advance(
                &WizardStep::AwaitingLabelRename(target),
                &PendingFields::default(),
                &text("New label"),
            );
            assert_eq!(
                outcome.effect,
                Some(WizardEffect::SetEntry {
                    key,
                    value: serde_json::Value::String("New label".into()),
                })
            );
        }
    }

    #[test]
    fn layout_spec_replaces_the_entry_with_the_parsed_grid() {
        let outcome = advance(
            &WizardStep::AwaitingLayoutSpec,
            &PendingFields::default(),
            &text("A,B\nC"),
        );
        assert_eq!(
            outcome.effect,
            Some(WizardEffect::SetEntry {
                key: ConfigKey::KeyboardLayout,
                value: serde_json::json!([["A", "B"], ["C"]]),
            })
        );
        assert_eq!(outcome.next, WizardState::default());
    }

    #[test]
    fn single_step_states_complete_immediately() {
        let welcome = advance(
            &WizardStep::AwaitingWelcomeText,
            &PendingFields::default(),
            &text("Welcome to the journey."),
        );
        assert!(matches!(
            welcome.effect,
            Some(WizardEffect::SetEntry {
                key: ConfigKey::WelcomeMessage,
                ..
            })
        ));
        assert_eq!(welcome.next, WizardState::default());

        let motivation = advance(
            &WizardStep::AwaitingMotivationText,
            &PendingFields::default(),
            &text("One day at a time."),
        );
        assert_eq!(
            motivation.effect,
            Some(WizardEffect::AddMotivation {
                text: "One day at a time.".into(),
            })
        );
    }

    #[test]
    fn begin_maps_entries_to_initial_steps() {
        let (state, _) = begin(WizardEntry::AddChannel);
        assert_eq!(state.step, Some(WizardStep::AwaitingChannelName));
        assert_eq!(state.pending, PendingFields::default());

        let (state, _) = begin(WizardEntry::Rename(RenameTarget::Streak));
        assert_eq!(
            state.step,
            Some(WizardStep::AwaitingLabelRename(RenameTarget::Streak))
        );
    }
}
