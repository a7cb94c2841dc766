use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::constants::ADMIN_PHONE;
use crate::error::AppError;
use crate::models::User;
use crate::security::{parse_bearer_token, BearerToken};
use crate::AppState;

/// An authenticated session, resolved from the Authorization header.
///
/// This is the only place credentials are inspected: both bearer formats
/// (signed session token, legacy base64 phone) end up here as a loaded user
/// row, and handlers only ever see the resulting capability object.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
}

impl AuthSession {
    /// Whether this session belongs to the admin account
    pub fn is_admin(&self) -> bool {
        self.user.phone == ADMIN_PHONE
    }

    /// Guard for admin-only routes
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            tracing::warn!("Admin route denied for user {}", self.user.id);
            Err(AppError::AdminOnly)
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let parsed = parse_bearer_token(token, &state.config.session_secret)
            .ok_or(AppError::InvalidToken)?;

        let user = match parsed {
            BearerToken::Session { user_id } => {
                sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
                    .bind(&user_id)
                    .fetch_optional(&state.pool)
                    .await?
            }
            // Legacy tokens carry the phone; the parser already normalized it
            BearerToken::Legacy { phone } => {
                sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone = ?")
                    .bind(&phone)
                    .fetch_optional(&state.pool)
                    .await?
            }
        };

        user.map(|user| AuthSession { user })
            .ok_or(AppError::InvalidToken)
    }
}
