// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common domain types shared across the Vigil workspace.
//!
//! Inbound events are normalized into closed sum types once, at the gateway
//! boundary; downstream components match on variants and never re-inspect
//! optional wire fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::VigilError;

/// Stable external identity of an end user or administrator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub String);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier of one inbound platform event; the dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by store health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Store is fully operational.
    Healthy,
    /// Store is operational but experiencing issues.
    Degraded(String),
    /// Store is not operational.
    Unhealthy(String),
}

// --- Inbound events ---

/// One inbound event from the messaging platform, normalized at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub event_id: EventId,
    pub actor_id: ActorId,
    /// Display name supplied by the platform, when present.
    pub display_name: Option<String>,
    pub kind: EventKind,
}

/// What the event carries: a free-form message or an inline-action callback.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Message(MessagePayload),
    Action(ActionCommand),
}

/// The payload of a message event.
///
/// Exactly one variant per platform media kind; decided once when the wire
/// event is parsed, never re-sniffed by consumers.
#[derive(Debug, Clone, PartialEq)]
pub enum MessagePayload {
    Text(String),
    Image {
        file_ref: String,
        caption: Option<String>,
    },
    Video {
        file_ref: String,
        caption: Option<String>,
    },
    Audio {
        file_ref: String,
        caption: Option<String>,
    },
}

impl MessagePayload {
    /// The text content, if this is a text payload.
    pub fn text(&self) -> Option<&str> {
        match self {
            MessagePayload::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }
}

/// Media kinds a stored reply can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

// --- Inline action commands ---

/// Reason tags selectable when recording a relapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RelapseReason {
    Boredom,
    Stress,
    Urge,
}

/// Which trigger label an admin rename flow targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RenameTarget {
    Urge,
    Streak,
}

/// Which wizard flow an admin menu action starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEntry {
    Motivation,
    Layout,
    Welcome,
    Rename(RenameTarget),
    AddChannel,
    AddReply,
}

/// A parsed inline-action callback.
///
/// Actions that mutate or display a specific actor's streak carry that
/// actor's id as `owner`; the dispatcher drops actions whose owner differs
/// from the sending actor. The remaining variants are admin-only.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionCommand {
    /// Show (or refresh) the owner's streak status.
    StreakPrompt { owner: ActorId },
    /// Show the relapse reason picker.
    RelapsePrompt { owner: ActorId },
    /// Record a relapse with the chosen reason.
    RecordRelapse {
        owner: ActorId,
        reason: RelapseReason,
    },
    /// Show the leaderboard.
    Leaderboard { owner: ActorId },
    /// Dismiss the current prompt.
    Dismiss { owner: ActorId },
    /// Open the admin menu.
    AdminMenu,
    /// Start a wizard flow.
    BeginWizard(WizardEntry),
    /// Delete a channel link by row id.
    DeleteChannel { id: i64 },
    /// Delete a custom reply by label.
    DeleteReply { label: String },
}

impl ActionCommand {
    /// The owner guard on this action, if it has one.
    pub fn owner(&self) -> Option<&ActorId> {
        match self {
            ActionCommand::StreakPrompt { owner }
            | ActionCommand::RelapsePrompt { owner }
            | ActionCommand::RecordRelapse { owner, .. }
            | ActionCommand::Leaderboard { owner }
            | ActionCommand::Dismiss { owner } => Some(owner),
            _ => None,
        }
    }

    /// True for actions only administrators may invoke.
    pub fn is_admin_only(&self) -> bool {
        matches!(
            self,
            ActionCommand::AdminMenu
                | ActionCommand::BeginWizard(_)
                | ActionCommand::DeleteChannel { .. }
                | ActionCommand::DeleteReply { .. }
        )
    }
}

impl std::fmt::Display for ActionCommand {
    /// Compact wire encoding carried in inline-action callback data.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionCommand::StreakPrompt { owner } => write!(f, "ref:{owner}"),
            ActionCommand::RelapsePrompt { owner } => write!(f, "rel:{owner}"),
            ActionCommand::RecordRelapse { owner, reason } => write!(f, "rsn:{reason}:{owner}"),
            ActionCommand::Leaderboard { owner } => write!(f, "top:{owner}"),
            ActionCommand::Dismiss { owner } => write!(f, "dis:{owner}"),
            ActionCommand::AdminMenu => write!(f, "adm"),
            ActionCommand::BeginWizard(entry) => {
                let tag = match entry {
                    WizardEntry::Motivation => "mot",
                    WizardEntry::Layout => "lay",
                    WizardEntry::Welcome => "wel",
                    WizardEntry::Rename(RenameTarget::Urge) => "ren-urge",
                    WizardEntry::Rename(RenameTarget::Streak) => "ren-streak",
                    WizardEntry::AddChannel => "chan",
                    WizardEntry::AddReply => "reply",
                };
                write!(f, "wiz:{tag}")
            }
            ActionCommand::DeleteChannel { id } => write!(f, "delch:{id}"),
            ActionCommand::DeleteReply { label } => write!(f, "delrep:{label}"),
        }
    }
}

impl std::str::FromStr for ActionCommand {
    type Err = VigilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VigilError::Validation(format!("unrecognized action: {s}"));

        if s == "adm" {
            return Ok(ActionCommand::AdminMenu);
        }

        let (head, rest) = s.split_once(':').ok_or_else(invalid)?;
        match head {
            "ref" => Ok(ActionCommand::StreakPrompt {
                owner: ActorId(rest.to_string()),
            }),
            "rel" => Ok(ActionCommand::RelapsePrompt {
                owner: ActorId(rest.to_string()),
            }),
            "rsn" => {
                let (reason, owner) = rest.split_once(':').ok_or_else(invalid)?;
                Ok(ActionCommand::RecordRelapse {
                    owner: ActorId(owner.to_string()),
                    reason: reason.parse().map_err(|_| invalid())?,
                })
            }
            "top" => Ok(ActionCommand::Leaderboard {
                owner: ActorId(rest.to_string()),
            }),
            "dis" => Ok(ActionCommand::Dismiss {
                owner: ActorId(rest.to_string()),
            }),
            "wiz" => {
                let entry = match rest {
                    "mot" => WizardEntry::Motivation,
                    "lay" => WizardEntry::Layout,
                    "wel" => WizardEntry::Welcome,
                    "ren-urge" => WizardEntry::Rename(RenameTarget::Urge),
                    "ren-streak" => WizardEntry::Rename(RenameTarget::Streak),
                    "chan" => WizardEntry::AddChannel,
                    "reply" => WizardEntry::AddReply,
                    _ => return Err(invalid()),
                };
                Ok(ActionCommand::BeginWizard(entry))
            }
            "delch" => Ok(ActionCommand::DeleteChannel {
                id: rest.parse().map_err(|_| invalid())?,
            }),
            "delrep" => Ok(ActionCommand::DeleteReply {
                label: rest.to_string(),
            }),
            _ => Err(invalid()),
        }
    }
}

// --- Wizard state ---

/// The pending wizard question for an actor.
///
/// "No wizard active" is modeled as `WizardState { step: None, .. }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    AwaitingWelcomeText,
    AwaitingLayoutSpec,
    AwaitingLabelRename(RenameTarget),
    AwaitingChannelName,
    AwaitingChannelLink,
    AwaitingButtonLabel,
    AwaitingButtonContent,
    AwaitingMotivationText,
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WizardStep::AwaitingWelcomeText => write!(f, "awaiting_welcome_text"),
            WizardStep::AwaitingLayoutSpec => write!(f, "awaiting_layout_spec"),
            WizardStep::AwaitingLabelRename(t) => write!(f, "awaiting_label_rename:{t}"),
            WizardStep::AwaitingChannelName => write!(f, "awaiting_channel_name"),
            WizardStep::AwaitingChannelLink => write!(f, "awaiting_channel_link"),
            WizardStep::AwaitingButtonLabel => write!(f, "awaiting_button_label"),
            WizardStep::AwaitingButtonContent => write!(f, "awaiting_button_content"),
            WizardStep::AwaitingMotivationText => write!(f, "awaiting_motivation_text"),
        }
    }
}

/// Temporary fields accumulated across multi-message wizard flows.
///
/// Cleared whenever the step transitions back to none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingFields {
    /// Channel name captured by `AwaitingChannelName`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    /// Reply label captured by `AwaitingButtonLabel`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_label: Option<String>,
}

/// Per-actor wizard state, embedded in [`Actor`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<WizardStep>,
    #[serde(default)]
    pub pending: PendingFields,
}

impl WizardState {
    /// A fresh state at the given step with no pending fields.
    pub fn at(step: WizardStep) -> Self {
        Self {
            step: Some(step),
            pending: PendingFields::default(),
        }
    }

    /// True when a wizard flow is active.
    pub fn is_active(&self) -> bool {
        self.step.is_some()
    }
}

// --- Actors and streaks ---

/// One end user, created on first interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: ActorId,
    pub display_name: Option<String>,
    /// Start of the current streak; reset to "now" on every relapse.
    pub streak_start: DateTime<Utc>,
    /// Longest completed streak in whole days; monotonically non-decreasing.
    pub best_streak: i64,
    pub wizard: WizardState,
}

/// One appended relapse history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelapseRecord {
    pub occurred_at: DateTime<Utc>,
    pub reason: RelapseReason,
}

/// A planned relapse mutation, applied atomically against the actor record.
///
/// The best-streak ratchet, the history append, and the streak-start reset
/// commit as one unit; no observer sees a partial application.
#[derive(Debug, Clone, PartialEq)]
pub struct RelapseUpdate {
    pub new_best: i64,
    pub new_start: DateTime<Utc>,
    pub record: RelapseRecord,
}

// --- Configuration entries and content items ---

/// Keys of admin-mutable configuration entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum ConfigKey {
    #[strum(serialize = "welcome_msg")]
    WelcomeMessage,
    #[strum(serialize = "keyboard_layout")]
    KeyboardLayout,
    #[strum(serialize = "urge_btn_label")]
    UrgeLabel,
    #[strum(serialize = "streak_btn_label")]
    StreakLabel,
    #[strum(serialize = "channel_btn_label")]
    ChannelLabel,
}

/// An administrator-published channel link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelLink {
    pub id: i64,
    pub name: String,
    pub link: String,
}

/// The stored content of a custom reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyContent {
    Text(String),
    Media {
        kind: MediaKind,
        file_ref: String,
        caption: Option<String>,
    },
}

/// An administrator-defined reply bound to a trigger label (unique).
#[derive(Debug, Clone, PartialEq)]
pub struct CustomReply {
    pub label: String,
    pub content: ReplyContent,
}

/// One motivation text, served at random on the urge trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct Motivation {
    pub id: i64,
    pub text: String,
    pub added_at: DateTime<Utc>,
}

// --- Outgoing intents ---

/// One inline-action button in a styled reply.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineAction {
    pub label: String,
    pub command: ActionCommand,
}

impl InlineAction {
    pub fn new(label: impl Into<String>, command: ActionCommand) -> Self {
        Self {
            label: label.into(),
            command,
        }
    }
}

/// A declarative reply produced by the core and rendered by the transport
/// adapter. The core never calls the transport directly.
#[derive(Debug, Clone, PartialEq)]
pub enum OutgoingIntent {
    /// Plain text reply.
    Text(String),
    /// Formatted reply with rows of inline actions.
    Styled {
        text: String,
        actions: Vec<Vec<InlineAction>>,
    },
    /// Media reply with an optional caption.
    Media {
        kind: MediaKind,
        file_ref: String,
        caption: Option<String>,
    },
    /// Text reply accompanied by a persistent keyboard layout.
    Keyboard {
        text: String,
        layout: Vec<Vec<String>>,
    },
}

// --- Acknowledgments ---

/// How the dispatcher disposed of an event. Observability only; the
/// transport-facing acknowledgment is unconditionally success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Disposition {
    /// The event was routed and handled.
    Processed,
    /// The event id was already in the dedup ledger; no side effects.
    Duplicate,
    /// Nothing recognized the event; no side effects.
    NoMatch,
    /// The deadline fired before the pipeline finished.
    TimedOut,
    /// An inner error was swallowed at the boundary.
    Failed,
}

/// The dispatcher's bounded-latency acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub disposition: Disposition,
}

impl Ack {
    pub fn new(disposition: Disposition) -> Self {
        Self { disposition }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn action_command_round_trips() {
        let commands = [
            ActionCommand::StreakPrompt {
                owner: ActorId("42".into()),
            },
            ActionCommand::RelapsePrompt {
                owner: ActorId("42".into()),
            },
            ActionCommand::RecordRelapse {
                owner: ActorId("42".into()),
                reason: RelapseReason::Stress,
            },
            ActionCommand::Leaderboard {
                owner: ActorId("42".into()),
            },
            ActionCommand::Dismiss {
                owner: ActorId("42".into()),
            },
            ActionCommand::AdminMenu,
            ActionCommand::BeginWizard(WizardEntry::Motivation),
            ActionCommand::BeginWizard(WizardEntry::Rename(RenameTarget::Streak)),
            ActionCommand::DeleteChannel { id: 7 },
            ActionCommand::DeleteReply {
                label: "Daily tips".into(),
            },
        ];

        for cmd in commands {
            let encoded = cmd.to_string();
            let decoded = ActionCommand::from_str(&encoded).expect("should parse back");
            assert_eq!(cmd, decoded, "round trip failed for {encoded}");
        }
    }

    #[test]
    fn action_command_rejects_garbage() {
        for s in ["", "zzz", "rsn:42", "rsn:nonsense:42", "delch:abc", "wiz:unknown"] {
            assert!(
                ActionCommand::from_str(s).is_err(),
                "expected parse failure for {s:?}"
            );
        }
    }

    #[test]
    fn delete_reply_label_may_contain_separator() {
        let cmd = ActionCommand::DeleteReply {
            label: "a:b:c".into(),
        };
        let decoded = ActionCommand::from_str(&cmd.to_string()).unwrap();
        assert_eq!(cmd, decoded);
    }

    #[test]
    fn owner_guard_covers_user_actions_only() {
        let owner = ActorId("9".into());
        assert!(
            ActionCommand::StreakPrompt {
                owner: owner.clone()
            }
            .owner()
            .is_some()
        );
        assert!(ActionCommand::AdminMenu.owner().is_none());
        assert!(ActionCommand::AdminMenu.is_admin_only());
        assert!(
            !ActionCommand::RelapsePrompt { owner }.is_admin_only()
        );
    }

    #[test]
    fn wizard_state_serializes_and_clears() {
        let state = WizardState {
            step: Some(WizardStep::AwaitingChannelLink),
            pending: PendingFields {
                channel_name: Some("Updates".into()),
                reply_label: None,
            },
        };
        let json = serde_json::to_string(&state).unwrap();
        let parsed: WizardState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, parsed);

        let idle = WizardState::default();
        assert!(!idle.is_active());
        assert_eq!(idle.pending, PendingFields::default());
    }

    #[test]
    fn wizard_step_rename_target_round_trips_via_serde() {
        let step = WizardStep::AwaitingLabelRename(RenameTarget::Urge);
        let json = serde_json::to_string(&step).unwrap();
        let parsed: WizardStep = serde_json::from_str(&json).unwrap();
        assert_eq!(step, parsed);
    }

    #[test]
    fn config_keys_use_stable_strings() {
        assert_eq!(ConfigKey::WelcomeMessage.to_string(), "welcome_msg");
        assert_eq!(ConfigKey::KeyboardLayout.to_string(), "keyboard_layout");
        assert_eq!(ConfigKey::UrgeLabel.to_string(), "urge_btn_label");
        assert_eq!(ConfigKey::StreakLabel.to_string(), "streak_btn_label");
        assert_eq!(ConfigKey::ChannelLabel.to_string(), "channel_btn_label");
    }

    #[test]
    fn relapse_reason_tags_round_trip() {
        for reason in [
            RelapseReason::Boredom,
            RelapseReason::Stress,
            RelapseReason::Urge,
        ] {
            let tag = reason.to_string();
            let parsed = RelapseReason::from_str(&tag).unwrap();
            assert_eq!(reason, parsed);
        }
    }
}
