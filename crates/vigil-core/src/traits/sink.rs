// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outgoing intent sink: the transport-facing seam.

use async_trait::async_trait;

use crate::error::VigilError;
use crate::types::{ActorId, OutgoingIntent};

/// Consumer of declarative replies.
///
/// The dispatcher hands every [`OutgoingIntent`] to a sink; the transport
/// adapter behind it renders keyboards, inline actions, and media for the
/// platform. Core components never call the transport directly.
#[async_trait]
pub trait IntentSink: Send + Sync {
    /// Deliver one intent addressed to `recipient`.
    async fn deliver(
        &self,
        recipient: &ActorId,
        intent: OutgoingIntent,
    ) -> Result<(), VigilError>;
}
