use waitline::models::entry::{CompletionOutcome, QueueStatus};
use waitline::AppError;

use super::test_helpers::clinic;

#[tokio::test]
async fn begin_serving_vacates_the_waiting_slot() {
    let c = clinic().await;
    let x = c.register("Xena", "+15550000061").await;
    let y = c.register("Yuri", "+15550000062").await;
    let z = c.register("Zoe", "+15550000063").await;
    let rx = c.walk_in(x.id).await;
    c.walk_in(y.id).await;
    c.walk_in(z.id).await;

    c.service.begin_serving(rx.id).await.expect("begin serving");

    let entry = c
        .service
        .repo()
        .get_by_id(rx.id)
        .await
        .expect("fetch")
        .expect("exists");
    assert_eq!(entry.status, QueueStatus::Serving);
    // Taking a patient back implies they were called in.
    assert!(entry.called_in_at.is_some());

    let snapshot = c.service.queue_snapshot().await.expect("snapshot");
    let names: Vec<&str> = snapshot.iter().map(|w| w.first_name.as_str()).collect();
    assert_eq!(names, vec!["Yuri", "Zoe"]);
    let positions: Vec<i64> = snapshot.iter().map(|w| w.entry.position).collect();
    assert_eq!(positions, vec![1, 2]);
}

#[tokio::test]
async fn completing_a_serving_entry_does_not_shift_the_queue_again() {
    let c = clinic().await;
    let x = c.register("Xena", "+15550000064").await;
    let y = c.register("Yuri", "+15550000065").await;
    let rx = c.walk_in(x.id).await;
    let ry = c.walk_in(y.id).await;

    c.service.begin_serving(rx.id).await.expect("begin serving");
    c.service
        .complete(rx.id, CompletionOutcome::Completed)
        .await
        .expect("complete");

    let entry = c
        .service
        .repo()
        .get_by_id(ry.id)
        .await
        .expect("fetch")
        .expect("exists");
    assert_eq!(entry.position, 1);
}

#[tokio::test]
async fn return_to_waiting_re_enters_at_the_tail() {
    let c = clinic().await;
    let x = c.register("Xena", "+15550000066").await;
    let y = c.register("Yuri", "+15550000067").await;
    let z = c.register("Zoe", "+15550000068").await;
    let rx = c.walk_in(x.id).await;
    c.walk_in(y.id).await;
    c.walk_in(z.id).await;

    c.service.begin_serving(rx.id).await.expect("begin serving");
    let position = c.service.return_to_waiting(rx.id).await.expect("reset");
    assert_eq!(position, 3);

    let entry = c
        .service
        .repo()
        .get_by_id(rx.id)
        .await
        .expect("fetch")
        .expect("exists");
    assert_eq!(entry.status, QueueStatus::Waiting);
    // The call-in is undone so the next call-in stamps a fresh time.
    assert!(entry.called_in_at.is_none());

    let snapshot = c.service.queue_snapshot().await.expect("snapshot");
    let names: Vec<&str> = snapshot.iter().map(|w| w.first_name.as_str()).collect();
    assert_eq!(names, vec!["Yuri", "Zoe", "Xena"]);
}

#[tokio::test]
async fn return_to_waiting_keeps_the_notified_latch() {
    let c = clinic().await;
    let p = c.register("Ana", "+15550000069").await;
    let r = c.walk_in(p.id).await;

    c.service.set_waiting_outside(r.id, true).await.expect("flag");
    assert_eq!(c.notifier.run_sweep().await.expect("sweep"), 1);

    c.service.begin_serving(r.id).await.expect("begin serving");
    c.service.return_to_waiting(r.id).await.expect("reset");

    // One alert per episode, even across a room round-trip.
    assert_eq!(c.notifier.run_sweep().await.expect("sweep"), 0);
    let entry = c
        .service
        .repo()
        .get_by_id(r.id)
        .await
        .expect("fetch")
        .expect("exists");
    assert!(entry.outside_notified);
}

#[tokio::test]
async fn begin_serving_requires_a_waiting_entry() {
    let c = clinic().await;
    let p = c.register("Ana", "+15550000070").await;
    let r = c.walk_in(p.id).await;

    c.service
        .complete(r.id, CompletionOutcome::Cancelled)
        .await
        .expect("complete");
    let err = c.service.begin_serving(r.id).await.expect_err("should fail");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn return_to_waiting_requires_a_serving_entry() {
    let c = clinic().await;
    let p = c.register("Ana", "+15550000071").await;
    let r = c.walk_in(p.id).await;

    let err = c
        .service
        .return_to_waiting(r.id)
        .await
        .expect_err("should fail");
    assert!(matches!(err, AppError::NotFound(_)));
}
