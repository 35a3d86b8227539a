// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Vigil streak bot.
//!
//! This crate provides the foundational error type, domain types, and the
//! [`SessionStore`] trait consumed by the dispatcher, wizard, and streak
//! engine. The transport and the persistence backend are collaborators
//! behind these seams.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VigilError;
pub use traits::{IntentSink, SessionStore};
pub use types::{Ack, ActorId, Disposition, EventId, HealthStatus, InboundEvent, OutgoingIntent};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_covers_dispatch_taxonomy() {
        // The dispatcher's error handling matches on these five kinds plus
        // the ambient config/channel/internal variants.
        let _dup = VigilError::DuplicateEvent {
            event_id: "u-1".into(),
        };
        let _validation = VigilError::Validation("bad payload".into());
        let _not_found = VigilError::NotFound {
            kind: "channel".into(),
            key: "7".into(),
        };
        let _storage = VigilError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _timeout = VigilError::Timeout {
            duration: std::time::Duration::from_millis(4500),
        };
        let _config = VigilError::Config("test".into());
        let _channel = VigilError::Channel {
            message: "test".into(),
            source: None,
        };
        let _internal = VigilError::Internal("test".into());

        assert!(_dup.is_duplicate());
        assert!(!_storage.is_duplicate());
    }

    #[test]
    fn session_store_is_object_safe() {
        fn _assert_dyn(_store: &dyn SessionStore) {}
    }
}
