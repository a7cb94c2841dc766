use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::access::{fetch_event, is_member, require_event_access};
use crate::constants::{ERR_INVALID_NAME, ERR_INVALID_PHONE};
use crate::error::{AppError, Result};
use crate::models::{User, ROLE_MEMBER};
use crate::phone::{is_valid_phone, normalize_phone};
use crate::session::AuthSession;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub phone: String,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub success: bool,
    pub user: User,
}

/// Invite a user to an event by phone number
///
/// Any member may invite. A number without an account gets an unverified
/// placeholder row, so the event is already waiting when the invitee signs
/// in for the first time.
pub async fn invite_member(
    State(state): State<AppState>,
    session: AuthSession,
    Path(event_id): Path<String>,
    Json(payload): Json<InviteRequest>,
) -> Result<(StatusCode, Json<InviteResponse>)> {
    // 1. Caller must be a member of the event
    require_event_access(&state.pool, &event_id, &session.user.id).await?;

    // 2. Normalize and validate the invited number
    let phone = normalize_phone(&payload.phone);
    if !is_valid_phone(&phone) {
        tracing::warn!("Invite rejected: invalid phone number");
        return Err(AppError::InvalidInput(ERR_INVALID_PHONE.to_string()));
    }

    // 3. Find or create the invitee
    let existing = sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone = ?")
        .bind(&phone)
        .fetch_optional(&state.pool)
        .await?;

    let now = Utc::now();
    let invitee = match existing {
        Some(user) => user,
        None => {
            let name = match &payload.name {
                Some(name) if !User::validate_name(name) => {
                    return Err(AppError::InvalidInput(ERR_INVALID_NAME.to_string()));
                }
                Some(name) => Some(name.trim().to_string()),
                None => None,
            };

            let id = Uuid::new_v4().to_string();
            sqlx::query("INSERT INTO users (id, phone, name, created_at) VALUES (?, ?, ?, ?)")
                .bind(&id)
                .bind(&phone)
                .bind(&name)
                .bind(now)
                .execute(&state.pool)
                .await?;
            tracing::info!("Placeholder account {} created for invite", id);

            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
                .bind(&id)
                .fetch_one(&state.pool)
                .await?
        }
    };

    // 4. Reject duplicates (the creator counts via their membership row)
    if is_member(&state.pool, &event_id, &invitee.id).await? {
        return Err(AppError::AlreadyMember);
    }

    // 5. Write the membership
    sqlx::query(
        "INSERT INTO event_members (id, event_id, user_id, role, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&event_id)
    .bind(&invitee.id)
    .bind(ROLE_MEMBER)
    .bind(now)
    .execute(&state.pool)
    .await?;

    tracing::info!(
        "User {} invited {} to event {}",
        session.user.id,
        invitee.id,
        event_id
    );

    Ok((
        StatusCode::CREATED,
        Json(InviteResponse {
            success: true,
            user: invitee,
        }),
    ))
}

/// Remove a member from an event
///
/// The creator may remove anyone but themselves; everyone else may only
/// remove themselves. Removing the creator is never allowed.
pub async fn remove_member(
    State(state): State<AppState>,
    session: AuthSession,
    Path((event_id, user_id)): Path<(String, String)>,
) -> Result<Json<Value>> {
    let event = fetch_event(&state.pool, &event_id).await?;

    if event.is_creator(&user_id) {
        return Err(AppError::CreatorCannotLeave);
    }
    if !event.is_creator(&session.user.id) && user_id != session.user.id {
        return Err(AppError::NotCreator);
    }

    let result = sqlx::query("DELETE FROM event_members WHERE event_id = ? AND user_id = ?")
        .bind(&event_id)
        .bind(&user_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::MemberNotFound);
    }

    tracing::info!(
        "User {} removed from event {} by {}",
        user_id,
        event_id,
        session.user.id
    );

    Ok(Json(json!({ "success": true })))
}
