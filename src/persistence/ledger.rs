//! Position ledger over the waiting partition.
//!
//! Keeps the set of positions among `status = 'waiting'` entries exactly
//! `{1..N}` — no gaps, no duplicates. Every function here takes a
//! connection that is already inside a repo-opened transaction, so a
//! multi-statement shift either commits whole or rolls back whole.

use sqlx::SqliteConnection;

use crate::{AppError, Result};

/// Next free position at the tail of the waiting order (1 when empty).
///
/// # Errors
///
/// Returns `AppError::Db` if the query fails.
pub async fn next_position(conn: &mut SqliteConnection) -> Result<i64> {
    let max: Option<i64> = sqlx::query_scalar(
        "SELECT MAX(position) FROM queue_entries WHERE status = 'waiting'",
    )
    .fetch_one(&mut *conn)
    .await?;
    Ok(max.unwrap_or(0) + 1)
}

/// Number of entries currently in the waiting partition.
///
/// # Errors
///
/// Returns `AppError::Db` if the query fails.
pub async fn waiting_count(conn: &mut SqliteConnection) -> Result<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM queue_entries WHERE status = 'waiting'")
            .fetch_one(&mut *conn)
            .await?;
    Ok(count)
}

/// Current position of a waiting entry, or `None` if the id does not
/// resolve to a waiting entry.
///
/// # Errors
///
/// Returns `AppError::Db` if the query fails.
pub async fn waiting_position(
    conn: &mut SqliteConnection,
    entry_id: i64,
) -> Result<Option<i64>> {
    let position: Option<i64> = sqlx::query_scalar(
        "SELECT position FROM queue_entries WHERE id = ?1 AND status = 'waiting'",
    )
    .bind(entry_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(position)
}

/// Move a waiting entry to `new_position`, shifting the intervening
/// waiting entries by exactly one slot. No-op when the entry is already
/// at the target position.
///
/// # Errors
///
/// Returns `AppError::NotFound` if `entry_id` is not a waiting entry and
/// `AppError::InvalidArgument` if `new_position` falls outside `[1, N]`.
pub async fn move_to(
    conn: &mut SqliteConnection,
    entry_id: i64,
    new_position: i64,
) -> Result<()> {
    let old_position = waiting_position(&mut *conn, entry_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("waiting entry {entry_id} not found")))?;

    let count = waiting_count(&mut *conn).await?;
    if new_position < 1 || new_position > count {
        return Err(AppError::InvalidArgument(format!(
            "position {new_position} outside [1, {count}]"
        )));
    }

    if new_position == old_position {
        return Ok(());
    }

    if new_position < old_position {
        // Moving up: the displaced block slides down one slot.
        sqlx::query(
            "UPDATE queue_entries SET position = position + 1
             WHERE status = 'waiting' AND position >= ?1 AND position < ?2 AND id != ?3",
        )
        .bind(new_position)
        .bind(old_position)
        .bind(entry_id)
        .execute(&mut *conn)
        .await?;
    } else {
        // Moving down: the displaced block slides up one slot.
        sqlx::query(
            "UPDATE queue_entries SET position = position - 1
             WHERE status = 'waiting' AND position > ?1 AND position <= ?2 AND id != ?3",
        )
        .bind(old_position)
        .bind(new_position)
        .bind(entry_id)
        .execute(&mut *conn)
        .await?;
    }

    sqlx::query("UPDATE queue_entries SET position = ?1 WHERE id = ?2")
        .bind(new_position)
        .bind(entry_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Close the gap left by an entry that vacated `removed_position`:
/// every waiting entry strictly below it moves up one slot.
///
/// # Errors
///
/// Returns `AppError::Db` if the update fails.
pub async fn close_gap(conn: &mut SqliteConnection, removed_position: i64) -> Result<()> {
    sqlx::query(
        "UPDATE queue_entries SET position = position - 1
         WHERE status = 'waiting' AND position > ?1",
    )
    .bind(removed_position)
    .execute(&mut *conn)
    .await?;
    Ok(())
}
