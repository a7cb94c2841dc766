use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::MAX_NAME_LEN;

/// User row
///
/// `phone` always holds the normalized form (see [`crate::phone`]), so every
/// lookup by phone must normalize first. `phone_verified` is set the first
/// time the user authenticates; accounts created by an invite keep it NULL
/// until the invitee signs in.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub phone: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub phone_verified: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Validate a display name: non-empty after trimming, within length limits
    pub fn validate_name(name: &str) -> bool {
        let trimmed = name.trim();
        !trimmed.is_empty() && trimmed.len() <= MAX_NAME_LEN
    }
}
