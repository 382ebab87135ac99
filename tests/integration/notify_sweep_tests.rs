use std::sync::Arc;

use waitline::persistence::notification_repo::NotificationRepo;
use waitline::persistence::settings_repo::{SettingsRepo, NOTIFICATION_THRESHOLD_KEY};

use super::test_helpers::{clinic, Clinic};

/// Three waiting patients; the front two flagged as waiting outside.
async fn outside_pair(c: &Clinic) -> (i64, i64, i64) {
    let a = c.register("Ana", "+15550000051").await;
    let b = c.register("Ben", "+15550000052").await;
    let d = c.register("Dot", "+15550000053").await;
    let ra = c.walk_in(a.id).await;
    let rb = c.walk_in(b.id).await;
    let rd = c.walk_in(d.id).await;

    c.service.set_waiting_outside(ra.id, true).await.expect("flag");
    c.service.set_waiting_outside(rb.id, true).await.expect("flag");
    (ra.id, rb.id, rd.id)
}

#[tokio::test]
async fn sweep_alerts_outside_patients_inside_the_threshold() {
    let c = clinic().await;
    let (_a, _b, d) = outside_pair(&c).await;
    // Third patient is outside too, but past the default threshold of 2.
    c.service.set_waiting_outside(d, true).await.expect("flag");

    let count = c.notifier.run_sweep().await.expect("sweep");
    assert_eq!(count, 2);

    let sent = c.messenger.sent_messages();
    assert_eq!(sent.len(), 2);
    // First in line gets the come-in-now text, second the heads-up.
    assert!(sent[0].body.contains("please come in now"));
    assert!(sent[1].body.contains("1 patient(s) ahead"));
    assert!(sent[1].body.contains("Ben"));
}

#[tokio::test]
async fn second_sweep_sends_nothing() {
    let c = clinic().await;
    outside_pair(&c).await;

    assert_eq!(c.notifier.run_sweep().await.expect("sweep"), 2);
    assert_eq!(c.notifier.run_sweep().await.expect("sweep"), 0);
    assert_eq!(c.messenger.sent_messages().len(), 2);
}

#[tokio::test]
async fn failed_send_still_consumes_the_episode_alert() {
    let c = clinic().await;
    let p = c.register("Ana", "+15550000054").await;
    let r = c.walk_in(p.id).await;
    c.service.set_waiting_outside(r.id, true).await.expect("flag");

    c.messenger.fail_next();
    assert_eq!(c.notifier.run_sweep().await.expect("sweep"), 1);
    assert!(c.messenger.sent_messages().is_empty());

    // No retry on the next pass.
    assert_eq!(c.notifier.run_sweep().await.expect("sweep"), 0);

    let log = NotificationRepo::new(Arc::clone(&c.db))
        .list_for_entry(r.id)
        .await
        .expect("log");
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].status, "failed");
}

#[tokio::test]
async fn toggling_the_outside_flag_does_not_rearm_the_alert() {
    let c = clinic().await;
    let p = c.register("Ana", "+15550000055").await;
    let r = c.walk_in(p.id).await;
    c.service.set_waiting_outside(r.id, true).await.expect("flag");

    assert_eq!(c.notifier.run_sweep().await.expect("sweep"), 1);

    c.service.set_waiting_outside(r.id, false).await.expect("clear");
    c.service.set_waiting_outside(r.id, true).await.expect("set again");
    assert_eq!(c.notifier.run_sweep().await.expect("sweep"), 0);
}

#[tokio::test]
async fn threshold_comes_from_the_settings_table() {
    let c = clinic().await;
    let (_a, b, _d) = outside_pair(&c).await;

    SettingsRepo::new(Arc::clone(&c.db))
        .set(NOTIFICATION_THRESHOLD_KEY, "1")
        .await
        .expect("set threshold");

    assert_eq!(c.notifier.run_sweep().await.expect("sweep"), 1);
    let sent = c.messenger.sent_messages();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("Ana"));

    // Widening the threshold later picks up the patient who was skipped.
    SettingsRepo::new(Arc::clone(&c.db))
        .set(NOTIFICATION_THRESHOLD_KEY, "2")
        .await
        .expect("set threshold");
    assert_eq!(c.notifier.run_sweep().await.expect("sweep"), 1);
    let entry = c
        .service
        .repo()
        .get_by_id(b)
        .await
        .expect("fetch")
        .expect("exists");
    assert!(entry.outside_notified);
}

#[tokio::test]
async fn sweep_ignores_patients_waiting_inside() {
    let c = clinic().await;
    let p = c.register("Ana", "+15550000056").await;
    c.walk_in(p.id).await;

    assert_eq!(c.notifier.run_sweep().await.expect("sweep"), 0);
    assert!(c.messenger.sent_messages().is_empty());
}
