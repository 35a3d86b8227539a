// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event dispatcher for the Vigil streak bot.
//!
//! The [`Dispatcher`] is the single entry point for inbound events. Per
//! event it:
//! - records the event id in the dedup ledger (duplicates short-circuit),
//! - routes to the admin wizard, a trigger handler, or a content lookup,
//! - races the whole pipeline against a deadline sized below the platform's
//!   webhook timeout,
//! - and always acknowledges, swallowing inner failures after logging them.
//!
//! Surfacing an error to the delivery channel would only trigger redundant
//! redelivery, so the acknowledgment and the business outcome are decoupled.

pub mod handlers;
pub mod labels;
pub mod sink;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use vigil_config::model::VigilConfig;
use vigil_core::types::{Ack, ActionCommand, Disposition, EventKind, InboundEvent, MessagePayload};
use vigil_core::{IntentSink, SessionStore, VigilError};

pub use sink::{ChannelSink, OutgoingReply};

/// Routes one inbound event through dedup, the deadline, and the handlers.
pub struct Dispatcher {
    store: Arc<dyn SessionStore>,
    sink: Arc<dyn IntentSink>,
    admins: HashSet<String>,
    deadline: Duration,
    retention: Duration,
}

impl Dispatcher {
    /// Build a dispatcher over the given collaborators.
    ///
    /// The admin allow-list and the timing knobs come from process-wide
    /// configuration and stay fixed for the dispatcher's lifetime.
    pub fn new(
        store: Arc<dyn SessionStore>,
        sink: Arc<dyn IntentSink>,
        config: &VigilConfig,
    ) -> Self {
        Self {
            store,
            sink,
            admins: config.admin.allow_list.iter().cloned().collect(),
            deadline: Duration::from_millis(config.dispatch.deadline_ms),
            retention: Duration::from_secs(config.dispatch.dedup_retention_secs.max(1) as u64),
        }
    }

    /// Handle one inbound event. Never returns an error: the acknowledgment
    /// is unconditional and bounded by the deadline.
    ///
    /// Cancellation is cooperative -- when the deadline fires, the in-flight
    /// pipeline is abandoned at its next await point and any writes already
    /// committed stand. There is no rollback.
    pub async fn handle(&self, event: &InboundEvent) -> Ack {
        let disposition = match tokio::time::timeout(self.deadline, self.process(event)).await {
            Ok(Ok(disposition)) => disposition,
            Ok(Err(e)) => {
                error!(event_id = %event.event_id, error = %e, "event processing failed");
                Disposition::Failed
            }
            Err(_) => {
                warn!(
                    event_id = %event.event_id,
                    deadline_ms = self.deadline.as_millis() as u64,
                    "deadline exceeded, abandoning pipeline"
                );
                Disposition::TimedOut
            }
        };

        debug!(event_id = %event.event_id, %disposition, "event acknowledged");
        Ack::new(disposition)
    }

    /// The inner pipeline: dedup, then routing.
    async fn process(&self, event: &InboundEvent) -> Result<Disposition, VigilError> {
        match self.store.note_event(&event.event_id, self.retention).await {
            Ok(()) => {}
            Err(e) if e.is_duplicate() => {
                debug!(event_id = %event.event_id, "already processed, skipping");
                return Ok(Disposition::Duplicate);
            }
            Err(e) => return Err(e),
        }

        match &event.kind {
            EventKind::Message(payload) => self.route_message(event, payload).await,
            EventKind::Action(command) => self.route_action(event, command).await,
        }
    }

    /// Route a message event: wizard first for mid-flow admins, then the
    /// fixed trigger set, then custom reply labels, then no-match.
    async fn route_message(
        &self,
        event: &InboundEvent,
        payload: &MessagePayload,
    ) -> Result<Disposition, VigilError> {
        let is_admin = self.is_admin(event);

        if is_admin
            && let Some(actor) = self.store.find_actor(&event.actor_id).await?
            && let Some(step) = actor.wizard.step.clone()
        {
            return self.wizard_message(event, &step, &actor.wizard.pending, payload).await;
        }

        // Outside the wizard only text can match a trigger.
        let Some(text) = payload.text().map(str::trim) else {
            return Ok(Disposition::NoMatch);
        };

        if text == "/start" {
            return self.handle_start(event, is_admin).await;
        }

        if is_admin && text == labels::ADMIN_PANEL_LABEL {
            return self.handle_admin_menu(event).await;
        }

        let triggers = labels::trigger_labels(self.store.as_ref()).await?;
        if text == triggers.urge {
            return self.handle_motivation(event).await;
        }
        if text == triggers.streak {
            return self.handle_streak_status(event).await;
        }
        if text == triggers.channel {
            return self.handle_channel_list(event).await;
        }

        if let Some(reply) = self.store.find_reply(text).await? {
            return self.handle_custom_reply(event, &reply).await;
        }

        debug!(event_id = %event.event_id, "no trigger matched");
        Ok(Disposition::NoMatch)
    }

    /// Route an inline-action event after the owner and admin guards.
    async fn route_action(
        &self,
        event: &InboundEvent,
        command: &ActionCommand,
    ) -> Result<Disposition, VigilError> {
        if let Some(owner) = command.owner()
            && owner != &event.actor_id
        {
            debug!(event_id = %event.event_id, "dismissing action owned by another actor");
            return Ok(Disposition::NoMatch);
        }

        if command.is_admin_only() && !self.is_admin(event) {
            debug!(event_id = %event.event_id, "admin-only action from non-admin");
            return Ok(Disposition::NoMatch);
        }

        match command {
            ActionCommand::StreakPrompt { .. } => self.handle_streak_status(event).await,
            ActionCommand::RelapsePrompt { .. } => self.handle_relapse_prompt(event).await,
            ActionCommand::RecordRelapse { reason, .. } => {
                self.handle_record_relapse(event, *reason).await
            }
            ActionCommand::Leaderboard { .. } => self.handle_leaderboard(event).await,
            ActionCommand::Dismiss { .. } => self.handle_dismiss(event).await,
            ActionCommand::AdminMenu => self.handle_admin_menu(event).await,
            ActionCommand::BeginWizard(entry) => self.handle_begin_wizard(event, *entry).await,
            ActionCommand::DeleteChannel { id } => self.handle_delete_channel(event, *id).await,
            ActionCommand::DeleteReply { label } => self.handle_delete_reply(event, label).await,
        }
    }

    pub(crate) fn is_admin(&self, event: &InboundEvent) -> bool {
        self.admins.contains(&event.actor_id.0)
    }

    pub(crate) fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    pub(crate) fn sink(&self) -> &dyn IntentSink {
        self.sink.as_ref()
    }
}
