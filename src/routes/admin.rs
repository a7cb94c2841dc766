use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{ERR_INVALID_NAME, ERR_INVALID_PHONE, MAX_TEXT_LEN};
use crate::error::{AppError, Result};
use crate::models::User;
use crate::phone::{is_valid_phone, normalize_phone};
use crate::session::AuthSession;
use crate::AppState;

/// One row of the admin user listing, with usage counts.
#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserRow {
    pub id: String,
    pub phone: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub phone_verified: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub event_count: i64,
    pub membership_count: i64,
    pub photo_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct AdminUpdateUserRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub success: bool,
    pub message: String,
}

/// List all users with created-event, membership and photo counts.
pub async fn admin_list_users(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<Vec<AdminUserRow>>> {
    session.require_admin()?;

    let users = sqlx::query_as::<_, AdminUserRow>(
        "SELECT u.*, \
            (SELECT COUNT(*) FROM events e WHERE e.creator_id = u.id) AS event_count, \
            (SELECT COUNT(*) FROM event_members m WHERE m.user_id = u.id) AS membership_count, \
            (SELECT COUNT(*) FROM event_photos p WHERE p.uploader_id = u.id) AS photo_count \
         FROM users u \
         ORDER BY u.created_at ASC",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(users))
}

/// Update any user's profile fields
///
/// Phone changes run through the same normalizer as registration and must
/// not collide with another account's number.
pub async fn admin_update_user(
    State(state): State<AppState>,
    session: AuthSession,
    Path(user_id): Path<String>,
    Json(payload): Json<AdminUpdateUserRequest>,
) -> Result<Json<User>> {
    session.require_admin()?;

    let mut user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AppError::UserNotFound)?;

    if let Some(phone) = payload.phone {
        let phone = normalize_phone(&phone);
        if !is_valid_phone(&phone) {
            return Err(AppError::InvalidInput(ERR_INVALID_PHONE.to_string()));
        }
        let taken: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE phone = ? AND id != ?")
                .bind(&phone)
                .bind(&user.id)
                .fetch_one(&state.pool)
                .await?;
        if taken > 0 {
            return Err(AppError::PhoneTaken);
        }
        user.phone = phone;
    }
    if let Some(name) = payload.name {
        if !User::validate_name(&name) {
            return Err(AppError::InvalidInput(ERR_INVALID_NAME.to_string()));
        }
        user.name = Some(name.trim().to_string());
    }
    if let Some(image) = payload.image {
        if image.len() > MAX_TEXT_LEN {
            return Err(AppError::InvalidInput("Image URL too long".to_string()));
        }
        user.image = if image.is_empty() { None } else { Some(image) };
    }

    sqlx::query("UPDATE users SET phone = ?, name = ?, image = ? WHERE id = ?")
        .bind(&user.phone)
        .bind(&user.name)
        .bind(&user.image)
        .bind(&user.id)
        .execute(&state.pool)
        .await?;

    tracing::info!("Admin updated user {}", user.id);

    Ok(Json(user))
}

/// Delete a user and everything they own
///
/// One transaction removes: photo rows they uploaded or that live in events
/// they created, memberships touching those events or held by them, events
/// they created, and finally the user row. Stored photo objects are deleted
/// best-effort after the commit.
pub async fn admin_delete_user(
    State(state): State<AppState>,
    session: AuthSession,
    Path(user_id): Path<String>,
) -> Result<Json<DeleteUserResponse>> {
    session.require_admin()?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AppError::UserNotFound)?;

    // Object keys for every photo this deletion takes with it
    let object_keys: Vec<String> = sqlx::query_scalar(
        "SELECT object_key FROM event_photos \
         WHERE uploader_id = ?1 \
            OR event_id IN (SELECT id FROM events WHERE creator_id = ?1)",
    )
    .bind(&user.id)
    .fetch_all(&state.pool)
    .await?;

    let mut tx = state.pool.begin().await?;

    // 1. Photo rows: uploaded by them, or inside their events
    sqlx::query(
        "DELETE FROM event_photos \
         WHERE uploader_id = ?1 \
            OR event_id IN (SELECT id FROM events WHERE creator_id = ?1)",
    )
    .bind(&user.id)
    .execute(&mut *tx)
    .await?;

    // 2. Memberships: theirs, or on their events
    sqlx::query(
        "DELETE FROM event_members \
         WHERE user_id = ?1 \
            OR event_id IN (SELECT id FROM events WHERE creator_id = ?1)",
    )
    .bind(&user.id)
    .execute(&mut *tx)
    .await?;

    // 3. Events they created
    sqlx::query("DELETE FROM events WHERE creator_id = ?")
        .bind(&user.id)
        .execute(&mut *tx)
        .await?;

    // 4. The user row itself
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(&user.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    for key in &object_keys {
        state.store.delete_quietly(key).await;
    }

    tracing::info!(
        "Admin deleted user {} ({} photo objects removed)",
        user.id,
        object_keys.len()
    );

    Ok(Json(DeleteUserResponse {
        success: true,
        message: "User and all associated data permanently deleted".to_string(),
    }))
}
