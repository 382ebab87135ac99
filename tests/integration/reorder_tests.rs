use waitline::models::entry::CompletionOutcome;
use waitline::AppError;

use super::test_helpers::clinic;

#[tokio::test]
async fn moving_the_tail_to_the_front_rotates_the_block() {
    let c = clinic().await;
    let x = c.register("Xena", "+15550000021").await;
    let y = c.register("Yuri", "+15550000022").await;
    let z = c.register("Zoe", "+15550000023").await;
    c.walk_in(x.id).await;
    c.walk_in(y.id).await;
    let rz = c.walk_in(z.id).await;

    c.service.reorder(rz.id, 1).await.expect("reorder");

    let snapshot = c.service.queue_snapshot().await.expect("snapshot");
    let names: Vec<&str> = snapshot.iter().map(|w| w.first_name.as_str()).collect();
    assert_eq!(names, vec!["Zoe", "Xena", "Yuri"]);
    let positions: Vec<i64> = snapshot.iter().map(|w| w.entry.position).collect();
    assert_eq!(positions, vec![1, 2, 3]);
}

#[tokio::test]
async fn removing_from_the_middle_closes_the_gap() {
    let c = clinic().await;
    let x = c.register("Xena", "+15550000024").await;
    let y = c.register("Yuri", "+15550000025").await;
    let z = c.register("Zoe", "+15550000026").await;
    c.walk_in(x.id).await;
    let ry = c.walk_in(y.id).await;
    c.walk_in(z.id).await;

    c.service
        .complete(ry.id, CompletionOutcome::Cancelled)
        .await
        .expect("complete");

    let snapshot = c.service.queue_snapshot().await.expect("snapshot");
    let names: Vec<&str> = snapshot.iter().map(|w| w.first_name.as_str()).collect();
    assert_eq!(names, vec!["Xena", "Zoe"]);
    let positions: Vec<i64> = snapshot.iter().map(|w| w.entry.position).collect();
    assert_eq!(positions, vec![1, 2]);
}

#[tokio::test]
async fn positions_stay_dense_across_a_mixed_sequence() {
    let c = clinic().await;
    let mut receipts = Vec::new();
    for i in 0..5 {
        let p = c.register(&format!("P{i}"), &format!("+1555000003{i}")).await;
        receipts.push(c.walk_in(p.id).await);
    }

    c.service.reorder(receipts[4].id, 2).await.expect("move up");
    c.service
        .complete(receipts[1].id, CompletionOutcome::Completed)
        .await
        .expect("complete");
    c.service.reorder(receipts[0].id, 3).await.expect("move down");
    c.service
        .complete(receipts[3].id, CompletionOutcome::NoShow)
        .await
        .expect("complete");

    let positions = c
        .service
        .repo()
        .waiting_positions()
        .await
        .expect("positions");
    assert_eq!(positions, vec![1, 2, 3]);
}

#[tokio::test]
async fn out_of_range_move_leaves_the_queue_untouched() {
    let c = clinic().await;
    let x = c.register("Xena", "+15550000041").await;
    let y = c.register("Yuri", "+15550000042").await;
    let rx = c.walk_in(x.id).await;
    c.walk_in(y.id).await;

    let err = c.service.reorder(rx.id, 5).await.expect_err("should reject");
    assert!(matches!(err, AppError::InvalidArgument(_)));

    let snapshot = c.service.queue_snapshot().await.expect("snapshot");
    let names: Vec<&str> = snapshot.iter().map(|w| w.first_name.as_str()).collect();
    assert_eq!(names, vec!["Xena", "Yuri"]);
}

#[tokio::test]
async fn reordering_a_completed_entry_is_not_found() {
    let c = clinic().await;
    let x = c.register("Xena", "+15550000043").await;
    let y = c.register("Yuri", "+15550000044").await;
    let rx = c.walk_in(x.id).await;
    c.walk_in(y.id).await;

    c.service
        .complete(rx.id, CompletionOutcome::Completed)
        .await
        .expect("complete");
    let err = c.service.reorder(rx.id, 1).await.expect_err("should fail");
    assert!(matches!(err, AppError::NotFound(_)));
}
