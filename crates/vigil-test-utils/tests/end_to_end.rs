// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end scenarios driving the full pipeline through the harness.

use vigil_core::types::{
    ActionCommand, ActorId, Disposition, MediaKind, OutgoingIntent, RelapseReason, WizardEntry,
};
use vigil_test_utils::{TestHarness, action_event, media_event, text_event};

/// An admin publishes a media button through the wizard; a user then
/// triggers it by label and receives the stored media.
#[tokio::test]
async fn admin_publishes_button_and_user_receives_it() {
    let h = TestHarness::builder()
        .with_admins(["admin"])
        .build()
        .await
        .unwrap();

    // Admin: open the wizard and capture label, then content.
    h.send(&action_event(
        "e-1",
        "admin",
        ActionCommand::BeginWizard(WizardEntry::AddReply),
    ))
    .await;
    h.send(&text_event("e-2", "admin", "Intro")).await;
    h.send(&media_event(
        "e-3",
        "admin",
        MediaKind::Video,
        "file-intro",
        Some("Start here"),
    ))
    .await;

    // User: press the freshly created button.
    let ack = h.send(&text_event("e-4", "user", "Intro")).await;
    assert_eq!(ack.disposition, Disposition::Processed);

    let replies = h.outgoing().await;
    let media_reply = replies
        .iter()
        .find(|r| r.recipient == ActorId("user".into()))
        .expect("user should receive a reply");
    assert_eq!(
        media_reply.intent,
        OutgoingIntent::Media {
            kind: MediaKind::Video,
            file_ref: "file-intro".into(),
            caption: Some("Start here".into()),
        }
    );
}

/// Relapses at different times push streak starts apart; the leaderboard
/// ranks the oldest start first and annotates fresh day counts.
#[tokio::test]
async fn leaderboard_ranks_oldest_streaks_first() {
    let h = TestHarness::builder().build().await.unwrap();

    // Three users appear, then two of them relapse (resetting their streak
    // start to "now", which is later than the first user's start).
    h.send(&text_event("e-1", "u-oldest", "/start")).await;
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    for (event, user) in [("e-2", "u-mid"), ("e-3", "u-new")] {
        h.send(&text_event(event, user, "/start")).await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        h.send(&action_event(
            &format!("{event}-rel"),
            user,
            ActionCommand::RecordRelapse {
                owner: ActorId(user.into()),
                reason: RelapseReason::Boredom,
            },
        ))
        .await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }

    let top = h.store().oldest_streaks(2).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].id, ActorId("u-oldest".into()));
    assert_eq!(top[1].id, ActorId("u-mid".into()));
}

/// Redelivered events change nothing: the relapse history grows once per
/// distinct event id, not per delivery.
#[tokio::test]
async fn redelivered_relapse_is_suppressed() {
    let h = TestHarness::builder().build().await.unwrap();

    let relapse = action_event(
        "e-1",
        "user",
        ActionCommand::RecordRelapse {
            owner: ActorId("user".into()),
            reason: RelapseReason::Urge,
        },
    );

    assert_eq!(h.send(&relapse).await.disposition, Disposition::Processed);
    assert_eq!(h.send(&relapse).await.disposition, Disposition::Duplicate);
    assert_eq!(h.send(&relapse).await.disposition, Disposition::Duplicate);

    let history = h.store().relapse_history(&ActorId("user".into())).await.unwrap();
    assert_eq!(history.len(), 1);
}

/// After k distinct relapses the history holds k records and the best
/// streak never decreased along the way.
#[tokio::test]
async fn history_grows_per_relapse_and_best_never_decreases() {
    let h = TestHarness::builder().build().await.unwrap();
    let user = ActorId("user".into());

    let mut last_best = 0;
    for i in 0..3 {
        h.send(&action_event(
            &format!("e-{i}"),
            "user",
            ActionCommand::RecordRelapse {
                owner: user.clone(),
                reason: RelapseReason::Stress,
            },
        ))
        .await;

        let actor = h.store().find_actor(&user).await.unwrap().unwrap();
        assert!(actor.best_streak >= last_best);
        last_best = actor.best_streak;
    }

    let history = h.store().relapse_history(&user).await.unwrap();
    assert_eq!(history.len(), 3);
}

/// The admin panel trigger is inert for ordinary users.
#[tokio::test]
async fn admin_panel_label_is_inert_for_ordinary_users() {
    let h = TestHarness::builder()
        .with_admins(["admin"])
        .build()
        .await
        .unwrap();

    let ack = h.send(&text_event("e-1", "user", "🔐 Admin panel")).await;
    assert_eq!(ack.disposition, Disposition::NoMatch);
    assert!(h.outgoing().await.is_empty());
}
