use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::access::{fetch_event, is_member, require_event_access, require_event_creator};
use crate::constants::{ERR_INVALID_NAME, MAX_NAME_LEN, MAX_TEXT_LEN};
use crate::error::{AppError, Result};
use crate::models::{Event, EventSummary, MemberInfo, ROLE_CREATOR, ROLE_MEMBER};
use crate::session::AuthSession;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub location: Option<String>,
}

/// Event detail: the event row plus its member list and photo count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub event: Event,
    pub members: Vec<MemberInfo>,
    pub photo_count: i64,
}

fn validate_event_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(AppError::InvalidInput(ERR_INVALID_NAME.to_string()));
    }
    Ok(name.to_string())
}

fn validate_optional_text(value: &Option<String>, field: &str) -> Result<()> {
    if let Some(text) = value {
        if text.len() > MAX_TEXT_LEN {
            return Err(AppError::InvalidInput(format!(
                "Field '{}' exceeds {} characters",
                field, MAX_TEXT_LEN
            )));
        }
    }
    Ok(())
}

/// List the caller's events
///
/// Returns events the caller created or joined, soonest first, with member
/// and photo counts for the overview screen.
pub async fn list_events(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<Vec<EventSummary>>> {
    let events = sqlx::query_as::<_, EventSummary>(
        "SELECT e.*, \
            (SELECT COUNT(*) FROM event_members m WHERE m.event_id = e.id) AS member_count, \
            (SELECT COUNT(*) FROM event_photos p WHERE p.event_id = e.id) AS photo_count \
         FROM events e \
         WHERE e.creator_id = ?1 \
            OR EXISTS (SELECT 1 FROM event_members m2 WHERE m2.event_id = e.id AND m2.user_id = ?1) \
         ORDER BY e.date ASC",
    )
    .bind(&session.user.id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(events))
}

/// Create an event
///
/// The event row and the creator's membership row are written in one
/// transaction, so the creator is a member from the first moment.
pub async fn create_event(
    State(state): State<AppState>,
    session: AuthSession,
    Json(payload): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>)> {
    let name = validate_event_name(&payload.name)?;
    validate_optional_text(&payload.description, "description")?;
    validate_optional_text(&payload.location, "location")?;

    let event_id = Uuid::new_v4().to_string();
    let now = Utc::now();

    let mut tx = state.pool.begin().await?;

    sqlx::query(
        "INSERT INTO events (id, name, description, date, location, creator_id, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&event_id)
    .bind(&name)
    .bind(&payload.description)
    .bind(payload.date)
    .bind(&payload.location)
    .bind(&session.user.id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO event_members (id, event_id, user_id, role, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&event_id)
    .bind(&session.user.id)
    .bind(ROLE_CREATOR)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!("Event {} created by user {}", event_id, session.user.id);

    let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
        .bind(&event_id)
        .fetch_one(&state.pool)
        .await?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// Event detail with members
///
/// Members only. The member list joins in each user's profile fields.
pub async fn get_event(
    State(state): State<AppState>,
    session: AuthSession,
    Path(event_id): Path<String>,
) -> Result<Json<EventDetailResponse>> {
    let event = require_event_access(&state.pool, &event_id, &session.user.id).await?;

    let members = sqlx::query_as::<_, MemberInfo>(
        "SELECT m.user_id, m.role, u.name, u.image, u.phone, m.created_at AS joined_at \
         FROM event_members m \
         JOIN users u ON u.id = m.user_id \
         WHERE m.event_id = ? \
         ORDER BY m.created_at ASC",
    )
    .bind(&event_id)
    .fetch_all(&state.pool)
    .await?;

    let photo_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM event_photos WHERE event_id = ?")
            .bind(&event_id)
            .fetch_one(&state.pool)
            .await?;

    Ok(Json(EventDetailResponse {
        event,
        members,
        photo_count,
    }))
}

/// Update an event (creator only)
///
/// Partial update: omitted fields keep their value, empty description or
/// location strings clear the field.
pub async fn update_event(
    State(state): State<AppState>,
    session: AuthSession,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<Event>> {
    let mut event = require_event_creator(&state.pool, &event_id, &session.user.id).await?;

    if let Some(name) = &payload.name {
        event.name = validate_event_name(name)?;
    }
    if let Some(date) = payload.date {
        event.date = date;
    }
    validate_optional_text(&payload.description, "description")?;
    if let Some(description) = payload.description {
        event.description = if description.is_empty() {
            None
        } else {
            Some(description)
        };
    }
    validate_optional_text(&payload.location, "location")?;
    if let Some(location) = payload.location {
        event.location = if location.is_empty() {
            None
        } else {
            Some(location)
        };
    }

    sqlx::query("UPDATE events SET name = ?, description = ?, date = ?, location = ? WHERE id = ?")
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .bind(&event.id)
        .execute(&state.pool)
        .await?;

    tracing::info!("Event {} updated by user {}", event_id, session.user.id);

    Ok(Json(event))
}

/// Delete an event (creator only)
///
/// Membership and photo rows go with it through the schema's cascades. The
/// stored photo objects are deleted best-effort afterwards, so a storage
/// failure cannot block the deletion.
pub async fn delete_event(
    State(state): State<AppState>,
    session: AuthSession,
    Path(event_id): Path<String>,
) -> Result<Json<Value>> {
    require_event_creator(&state.pool, &event_id, &session.user.id).await?;

    let object_keys: Vec<String> =
        sqlx::query_scalar("SELECT object_key FROM event_photos WHERE event_id = ?")
            .bind(&event_id)
            .fetch_all(&state.pool)
            .await?;

    sqlx::query("DELETE FROM events WHERE id = ?")
        .bind(&event_id)
        .execute(&state.pool)
        .await?;

    for key in &object_keys {
        state.store.delete_quietly(key).await;
    }

    tracing::info!(
        "Event {} deleted by user {} ({} photos removed)",
        event_id,
        session.user.id,
        object_keys.len()
    );

    Ok(Json(json!({ "success": true })))
}

/// Join an event
pub async fn join_event(
    State(state): State<AppState>,
    session: AuthSession,
    Path(event_id): Path<String>,
) -> Result<Json<Value>> {
    let event = fetch_event(&state.pool, &event_id).await?;

    if event.is_creator(&session.user.id)
        || is_member(&state.pool, &event_id, &session.user.id).await?
    {
        return Err(AppError::AlreadyMember);
    }

    sqlx::query(
        "INSERT INTO event_members (id, event_id, user_id, role, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&event_id)
    .bind(&session.user.id)
    .bind(ROLE_MEMBER)
    .bind(Utc::now())
    .execute(&state.pool)
    .await?;

    tracing::info!("User {} joined event {}", session.user.id, event_id);

    Ok(Json(json!({ "success": true })))
}

/// Leave an event
///
/// The creator cannot leave; they delete the event instead.
pub async fn leave_event(
    State(state): State<AppState>,
    session: AuthSession,
    Path(event_id): Path<String>,
) -> Result<Json<Value>> {
    let event = fetch_event(&state.pool, &event_id).await?;

    if event.is_creator(&session.user.id) {
        return Err(AppError::CreatorCannotLeave);
    }

    let result = sqlx::query("DELETE FROM event_members WHERE event_id = ? AND user_id = ?")
        .bind(&event_id)
        .bind(&session.user.id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotMember);
    }

    tracing::info!("User {} left event {}", session.user.id, event_id);

    Ok(Json(json!({ "success": true })))
}
