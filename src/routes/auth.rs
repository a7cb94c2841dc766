use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{ERR_INVALID_NAME, ERR_INVALID_PHONE, SESSION_TTL_SECS};
use crate::error::{AppError, Result};
use crate::models::User;
use crate::phone::{is_valid_phone, normalize_phone};
use crate::security::issue_session_token;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub phone: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Register a new account
///
/// The phone number is normalized before lookup and storage, so the stored
/// form matches invites and logins no matter how the number was typed.
///
/// An unverified placeholder row (created when someone invited this number
/// before the owner signed up) is claimed rather than rejected. A verified
/// account on the same number returns 409.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    // 1. Normalize and validate input
    let phone = normalize_phone(&payload.phone);
    if !is_valid_phone(&phone) {
        tracing::warn!("Registration rejected: invalid phone number");
        return Err(AppError::InvalidInput(ERR_INVALID_PHONE.to_string()));
    }
    if !User::validate_name(&payload.name) {
        return Err(AppError::InvalidInput(ERR_INVALID_NAME.to_string()));
    }
    let name = payload.name.trim().to_string();

    // 2. Check for an existing account on this number
    let existing = sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone = ?")
        .bind(&phone)
        .fetch_optional(&state.pool)
        .await?;

    let now = Utc::now();
    let user_id = match existing {
        Some(user) if user.phone_verified.is_some() => {
            tracing::info!("Registration rejected: phone already registered");
            return Err(AppError::UserAlreadyExists);
        }
        Some(user) => {
            // 3a. Claim the placeholder: set the chosen name and mark verified
            sqlx::query("UPDATE users SET name = ?, phone_verified = ? WHERE id = ?")
                .bind(&name)
                .bind(now)
                .bind(&user.id)
                .execute(&state.pool)
                .await?;
            tracing::info!("Placeholder account {} claimed at registration", user.id);
            user.id
        }
        None => {
            // 3b. Fresh account
            let id = Uuid::new_v4().to_string();
            sqlx::query(
                "INSERT INTO users (id, phone, name, phone_verified, created_at) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(&phone)
            .bind(&name)
            .bind(now)
            .bind(now)
            .execute(&state.pool)
            .await?;
            tracing::info!("New user {} registered", id);
            id
        }
    };

    // 4. Issue a session token for the stored row
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&user_id)
        .fetch_one(&state.pool)
        .await?;
    let token = issue_session_token(&user.id, SESSION_TTL_SECS, &state.config.session_secret);

    Ok(Json(AuthResponse { token, user }))
}

/// Sign in with a phone number
///
/// Unknown numbers get a 401 rather than an implicit signup. The first
/// sign-in of an invited account stamps `phone_verified`.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let phone = normalize_phone(&payload.phone);

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone = ?")
        .bind(&phone)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| {
            tracing::info!("Login rejected: unknown phone number");
            AppError::UnknownPhone
        })?;

    let user = if user.phone_verified.is_none() {
        sqlx::query("UPDATE users SET phone_verified = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(&user.id)
            .execute(&state.pool)
            .await?;
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(&user.id)
            .fetch_one(&state.pool)
            .await?
    } else {
        user
    };

    let token = issue_session_token(&user.id, SESSION_TTL_SECS, &state.config.session_secret);
    tracing::info!("User {} logged in", user.id);

    Ok(Json(AuthResponse { token, user }))
}
