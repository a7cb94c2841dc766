use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::constants::{ERR_INVALID_NAME, MAX_TEXT_LEN};
use crate::error::{AppError, Result};
use crate::models::User;
use crate::phone::normalize_phone;
use crate::session::AuthSession;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub phone: String,
}

/// Current user's profile
pub async fn get_me(session: AuthSession) -> Json<User> {
    Json(session.user)
}

/// Update the current user's profile
///
/// Partial update: omitted fields keep their value, an empty image string
/// clears the image.
pub async fn update_me(
    State(state): State<AppState>,
    session: AuthSession,
    Json(payload): Json<UpdateMeRequest>,
) -> Result<Json<User>> {
    let mut user = session.user;

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

    sqlx::query("UPDATE users SET name = ?, image = ? WHERE id = ?")
        .bind(&user.name)
        .bind(&user.image)
        .bind(&user.id)
        .execute(&state.pool)
        .await?;

    Ok(Json(user))
}

/// Look up a user by phone number
///
/// The query value runs through the normalizer first, so clients can send
/// the number in any formatting. Requires a session; used by the invite UI.
pub async fn search_users(
    State(state): State<AppState>,
    _session: AuthSession,
    Query(params): Query<SearchParams>,
) -> Result<Json<User>> {
    let phone = normalize_phone(&params.phone);

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone = ?")
        .bind(&phone)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AppError::UserNotFound)?;

    Ok(Json(user))
}
