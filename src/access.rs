//! Membership and ownership checks shared by the event and photo routes.
//!
//! Access to an event means: the caller created it, or a membership row
//! exists. The creator check runs against `events.creator_id` rather than
//! the creator's membership row, so the "creator is always a member"
//! invariant holds even for rows written before the membership row existed.

use sqlx::SqlitePool;

use crate::error::{AppError, Result};
use crate::models::Event;

/// Load an event or fail with 404.
pub async fn fetch_event(pool: &SqlitePool, event_id: &str) -> Result<Event> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
        .bind(event_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::EventNotFound)
}

/// Whether a membership row exists for the user on this event.
pub async fn is_member(pool: &SqlitePool, event_id: &str, user_id: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM event_members WHERE event_id = ? AND user_id = ?",
    )
    .bind(event_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

/// Require that the user may access the event (creator or member).
///
/// Returns the event so callers don't have to fetch it twice. 404 when the
/// event does not exist, 403 when it exists but the user has no membership.
pub async fn require_event_access(
    pool: &SqlitePool,
    event_id: &str,
    user_id: &str,
) -> Result<Event> {
    let event = fetch_event(pool, event_id).await?;

    if event.is_creator(user_id) || is_member(pool, event_id, user_id).await? {
        Ok(event)
    } else {
        tracing::warn!("User {} denied access to event {}", user_id, event_id);
        Err(AppError::NotMember)
    }
}

/// Require that the user created the event.
pub async fn require_event_creator(
    pool: &SqlitePool,
    event_id: &str,
    user_id: &str,
) -> Result<Event> {
    let event = fetch_event(pool, event_id).await?;

    if event.is_creator(user_id) {
        Ok(event)
    } else {
        tracing::warn!("User {} is not the creator of event {}", user_id, event_id);
        Err(AppError::NotCreator)
    }
}
