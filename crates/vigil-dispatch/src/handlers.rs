// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-trigger and per-action handlers.
//!
//! Every handler delivers its reply as a declarative [`OutgoingIntent`] and
//! reports how the event was disposed of; the transport is never touched
//! directly.

use chrono::Utc;
use tracing::{debug, info};

use vigil_core::VigilError;
use vigil_core::types::{
    ActionCommand, ConfigKey, CustomReply, Disposition, InboundEvent, InlineAction,
    MessagePayload, OutgoingIntent, PendingFields, RelapseReason, RenameTarget, ReplyContent,
    WizardEntry, WizardState, WizardStep,
};
use vigil_wizard::WizardEffect;

use crate::labels;
use crate::Dispatcher;

const LEADERBOARD_SIZE: i64 = 10;

impl Dispatcher {
    /// `/start`: upsert the actor, reset any admin wizard flow, and present
    /// the composed keyboard with the welcome text.
    pub(crate) async fn handle_start(
        &self,
        event: &InboundEvent,
        is_admin: bool,
    ) -> Result<Disposition, VigilError> {
        let actor = self
            .store()
            .upsert_actor(&event.actor_id, event.display_name.as_deref())
            .await?;

        // A fresh session start is an out-of-band wizard reset.
        if is_admin && actor.wizard.is_active() {
            self.store()
                .set_wizard_state(&event.actor_id, &WizardState::default())
                .await?;
        }

        let triggers = labels::trigger_labels(self.store()).await?;
        let layout = labels::compose_keyboard(self.store(), &triggers, is_admin).await?;

        let name = actor.display_name.as_deref().unwrap_or("Friend");
        let welcome = labels::text_entry(
            self.store(),
            ConfigKey::WelcomeMessage,
            &format!("Hi {name}! Pick an option below."),
        )
        .await?;

        self.sink()
            .deliver(&event.actor_id, OutgoingIntent::Keyboard { text: welcome, layout })
            .await?;
        Ok(Disposition::Processed)
    }

    /// Streak status with relapse/leaderboard/refresh actions. Unknown
    /// actors are created lazily with a streak starting now.
    pub(crate) async fn handle_streak_status(
        &self,
        event: &InboundEvent,
    ) -> Result<Disposition, VigilError> {
        let actor = self
            .store()
            .upsert_actor(&event.actor_id, event.display_name.as_deref())
            .await?;

        let days = vigil_streak::elapsed_days(actor.streak_start, Utc::now());
        let name = actor.display_name.as_deref().unwrap_or("Friend");
        let owner = event.actor_id.clone();

        self.sink()
            .deliver(
                &event.actor_id,
                OutgoingIntent::Styled {
                    text: format!(
                        "🔥 {name}\nStreak: {days} days\nBest: {} days",
                        actor.best_streak
                    ),
                    actions: vec![
                        vec![InlineAction::new(
                            "💔 I relapsed",
                            ActionCommand::RelapsePrompt { owner: owner.clone() },
                        )],
                        vec![InlineAction::new(
                            "🏆 Leaderboard",
                            ActionCommand::Leaderboard { owner: owner.clone() },
                        )],
                        vec![InlineAction::new(
                            "🔄 Refresh",
                            ActionCommand::StreakPrompt { owner },
                        )],
                    ],
                },
            )
            .await?;
        Ok(Disposition::Processed)
    }

    /// Reason picker shown before a relapse is recorded.
    pub(crate) async fn handle_relapse_prompt(
        &self,
        event: &InboundEvent,
    ) -> Result<Disposition, VigilError> {
        let owner = event.actor_id.clone();
        let reason_button = |label: &str, reason: RelapseReason| {
            InlineAction::new(
                label,
                ActionCommand::RecordRelapse {
                    owner: owner.clone(),
                    reason,
                },
            )
        };

        self.sink()
            .deliver(
                &event.actor_id,
                OutgoingIntent::Styled {
                    text: "What triggered it?".to_string(),
                    actions: vec![
                        vec![reason_button("🥱 Boredom", RelapseReason::Boredom)],
                        vec![reason_button("😰 Stress", RelapseReason::Stress)],
                        vec![reason_button("🔥 Urge", RelapseReason::Urge)],
                        vec![InlineAction::new(
                            "❌ Cancel",
                            ActionCommand::Dismiss { owner: owner.clone() },
                        )],
                    ],
                },
            )
            .await?;
        Ok(Disposition::Processed)
    }

    /// Record a relapse: ratchet the best streak, log the reason, reset the
    /// counter. The three mutations commit atomically in the store.
    pub(crate) async fn handle_record_relapse(
        &self,
        event: &InboundEvent,
        reason: RelapseReason,
    ) -> Result<Disposition, VigilError> {
        let actor = self
            .store()
            .upsert_actor(&event.actor_id, event.display_name.as_deref())
            .await?;

        let update = vigil_streak::plan_relapse(&actor, reason, Utc::now());
        self.store().apply_relapse(&event.actor_id, &update).await?;

        info!(actor_id = %event.actor_id, %reason, "relapse recorded");
        self.sink()
            .deliver(
                &event.actor_id,
                OutgoingIntent::Text("✅ Counter reset to day 0. Stay strong!".to_string()),
            )
            .await?;
        Ok(Disposition::Processed)
    }

    /// Top streaks, recomputed fresh against the current time.
    pub(crate) async fn handle_leaderboard(
        &self,
        event: &InboundEvent,
    ) -> Result<Disposition, VigilError> {
        let rows =
            vigil_streak::leaderboard(self.store(), LEADERBOARD_SIZE, Utc::now()).await?;

        let mut text = format!("🏆 Top {LEADERBOARD_SIZE}\n");
        for row in &rows {
            text.push_str(&format!("{}. {} — {} days\n", row.rank, row.display_name, row.days));
        }

        self.sink()
            .deliver(
                &event.actor_id,
                OutgoingIntent::Styled {
                    text,
                    actions: vec![vec![InlineAction::new(
                        "🔙 Back",
                        ActionCommand::StreakPrompt {
                            owner: event.actor_id.clone(),
                        },
                    )]],
                },
            )
            .await?;
        Ok(Disposition::Processed)
    }

    pub(crate) async fn handle_dismiss(
        &self,
        event: &InboundEvent,
    ) -> Result<Disposition, VigilError> {
        self.sink()
            .deliver(&event.actor_id, OutgoingIntent::Text("Cancelled.".to_string()))
            .await?;
        Ok(Disposition::Processed)
    }

    /// Random motivation on the urge trigger.
    pub(crate) async fn handle_motivation(
        &self,
        event: &InboundEvent,
    ) -> Result<Disposition, VigilError> {
        let Some(motivation) = self.store().random_motivation().await? else {
            self.sink()
                .deliver(
                    &event.actor_id,
                    OutgoingIntent::Text("No motivations have been added yet.".to_string()),
                )
                .await?;
            return Ok(Disposition::Processed);
        };

        self.sink()
            .deliver(
                &event.actor_id,
                OutgoingIntent::Text(format!("💪 Stay strong!\n\n{}", motivation.text)),
            )
            .await?;
        Ok(Disposition::Processed)
    }

    /// List the published channel links.
    pub(crate) async fn handle_channel_list(
        &self,
        event: &InboundEvent,
    ) -> Result<Disposition, VigilError> {
        let channels = self.store().list_channels().await?;

        let text = if channels.is_empty() {
            "No channels yet.".to_string()
        } else {
            let mut text = "Channels:\n".to_string();
            for channel in &channels {
                text.push_str(&format!("{} — {}\n", channel.name, channel.link));
            }
            text
        };

        self.sink()
            .deliver(&event.actor_id, OutgoingIntent::Text(text))
            .await?;
        Ok(Disposition::Processed)
    }

    /// Render a stored custom reply by its content type.
    pub(crate) async fn handle_custom_reply(
        &self,
        event: &InboundEvent,
        reply: &CustomReply,
    ) -> Result<Disposition, VigilError> {
        let intent = match &reply.content {
            ReplyContent::Text(text) => OutgoingIntent::Text(text.clone()),
            ReplyContent::Media {
                kind,
                file_ref,
                caption,
            } => OutgoingIntent::Media {
                kind: *kind,
                file_ref: file_ref.clone(),
                caption: caption.clone(),
            },
        };

        self.sink().deliver(&event.actor_id, intent).await?;
        Ok(Disposition::Processed)
    }

    /// The admin menu: wizard entry points plus delete buttons for the
    /// existing channels and custom replies.
    pub(crate) async fn handle_admin_menu(
        &self,
        event: &InboundEvent,
    ) -> Result<Disposition, VigilError> {
        let user_count = self.store().actor_count().await?;

        let entry = |label: &str, entry: WizardEntry| {
            InlineAction::new(label, ActionCommand::BeginWizard(entry))
        };
        let mut actions = vec![
            vec![
                entry("➕ Motivation", WizardEntry::Motivation),
                entry("🔲 Layout", WizardEntry::Layout),
            ],
            vec![
                entry("📝 Welcome message", WizardEntry::Welcome),
                entry("➕ Channel", WizardEntry::AddChannel),
            ],
            vec![
                entry("🏷️ Rename urge button", WizardEntry::Rename(RenameTarget::Urge)),
                entry(
                    "🏷️ Rename streak button",
                    WizardEntry::Rename(RenameTarget::Streak),
                ),
            ],
            vec![entry("🔘 Custom button", WizardEntry::AddReply)],
        ];

        for channel in self.store().list_channels().await? {
            actions.push(vec![InlineAction::new(
                format!("🗑️ Channel: {}", channel.name),
                ActionCommand::DeleteChannel { id: channel.id },
            )]);
        }
        for reply in self.store().list_replies().await? {
            actions.push(vec![InlineAction::new(
                format!("🗑️ Button: {}", reply.label),
                ActionCommand::DeleteReply { label: reply.label },
            )]);
        }

        self.sink()
            .deliver(
                &event.actor_id,
                OutgoingIntent::Styled {
                    text: format!("⚙️ Admin panel ({user_count} users)"),
                    actions,
                },
            )
            .await?;
        Ok(Disposition::Processed)
    }

    /// Enter a wizard flow: persist the initial step and send its prompt.
    pub(crate) async fn handle_begin_wizard(
        &self,
        event: &InboundEvent,
        entry: WizardEntry,
    ) -> Result<Disposition, VigilError> {
        let (state, prompt) = vigil_wizard::begin(entry);
        self.store().set_wizard_state(&event.actor_id, &state).await?;
        self.sink()
            .deliver(&event.actor_id, OutgoingIntent::Text(prompt))
            .await?;
        Ok(Disposition::Processed)
    }

    /// Advance the wizard with this message, apply the produced effect, and
    /// persist the next state.
    pub(crate) async fn wizard_message(
        &self,
        event: &InboundEvent,
        step: &WizardStep,
        pending: &PendingFields,
        payload: &MessagePayload,
    ) -> Result<Disposition, VigilError> {
        let outcome = vigil_wizard::advance(step, pending, payload);

        if let Some(effect) = &outcome.effect {
            match self.apply_effect(effect).await {
                Ok(()) => {}
                // Only CreateReply can collide on its unique label; re-prompt
                // for a distinct one instead of completing.
                Err(VigilError::Validation(message)) => {
                    let retry = WizardState::at(WizardStep::AwaitingButtonLabel);
                    self.store().set_wizard_state(&event.actor_id, &retry).await?;
                    self.sink()
                        .deliver(
                            &event.actor_id,
                            OutgoingIntent::Text(format!("{message}. Send a different label:")),
                        )
                        .await?;
                    return Ok(Disposition::Processed);
                }
                Err(e) => return Err(e),
            }
        }

        self.store()
            .set_wizard_state(&event.actor_id, &outcome.next)
            .await?;
        self.sink()
            .deliver(&event.actor_id, OutgoingIntent::Text(outcome.reply))
            .await?;
        Ok(Disposition::Processed)
    }

    /// Apply one declarative wizard effect against the store.
    async fn apply_effect(&self, effect: &WizardEffect) -> Result<(), VigilError> {
        match effect {
            WizardEffect::SetEntry { key, value } => self.store().put_entry(*key, value).await,
            WizardEffect::CreateChannel { name, link } => {
                self.store().create_channel(name, link).await.map(|_| ())
            }
            WizardEffect::CreateReply { label, content } => {
                self.store()
                    .create_reply(&CustomReply {
                        label: label.clone(),
                        content: content.clone(),
                    })
                    .await
            }
            WizardEffect::AddMotivation { text } => self.store().add_motivation(text).await,
        }
    }

    /// Delete a channel; absence is a user-visible no-op notice.
    pub(crate) async fn handle_delete_channel(
        &self,
        event: &InboundEvent,
        id: i64,
    ) -> Result<Disposition, VigilError> {
        let text = match self.store().delete_channel(id).await {
            Ok(()) => "Channel removed.".to_string(),
            Err(VigilError::NotFound { .. }) => {
                debug!(channel_id = id, "delete of missing channel");
                "That channel is already gone.".to_string()
            }
            Err(e) => return Err(e),
        };

        self.sink()
            .deliver(&event.actor_id, OutgoingIntent::Text(text))
            .await?;
        Ok(Disposition::Processed)
    }

    /// Delete a custom reply; absence is a user-visible no-op notice.
    pub(crate) async fn handle_delete_reply(
        &self,
        event: &InboundEvent,
        label: &str,
    ) -> Result<Disposition, VigilError> {
        let text = match self.store().delete_reply(label).await {
            Ok(()) => "Button removed.".to_string(),
            Err(VigilError::NotFound { .. }) => {
                debug!(label, "delete of missing reply");
                "That button is already gone.".to_string()
            }
            Err(e) => return Err(e),
        };

        self.sink()
            .deliver(&event.actor_id, OutgoingIntent::Text(text))
            .await?;
        Ok(Disposition::Processed)
    }
}
