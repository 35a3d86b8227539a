// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel-backed intent sink.
//!
//! Queues outgoing intents on an mpsc channel for the embedding process to
//! drain into the transport adapter.

use async_trait::async_trait;
use tokio::sync::mpsc;

use vigil_core::types::{ActorId, OutgoingIntent};
use vigil_core::{IntentSink, VigilError};

/// One addressed reply waiting for the transport adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingReply {
    pub recipient: ActorId,
    pub intent: OutgoingIntent,
}

/// [`IntentSink`] implementation backed by a bounded mpsc channel.
pub struct ChannelSink {
    tx: mpsc::Sender<OutgoingReply>,
}

impl ChannelSink {
    /// Create a sink and the receiver the embedding process drains.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<OutgoingReply>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl IntentSink for ChannelSink {
    async fn deliver(
        &self,
        recipient: &ActorId,
        intent: OutgoingIntent,
    ) -> Result<(), VigilError> {
        self.tx
            .send(OutgoingReply {
                recipient: recipient.clone(),
                intent,
            })
            .await
            .map_err(|e| VigilError::Channel {
                message: "intent receiver dropped".to_string(),
                source: Some(Box::new(e)),
            })
    }
}
