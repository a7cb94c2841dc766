use chrono::{DateTime, Utc};
use serde::Serialize;

/// Membership role written for the event creator
pub const ROLE_CREATOR: &str = "creator";

/// Membership role written for joined or invited users
pub const ROLE_MEMBER: &str = "member";

/// Event row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Whether the given user created this event. The creator is always
    /// treated as a member, even if the membership row were missing.
    pub fn is_creator(&self, user_id: &str) -> bool {
        self.creator_id == user_id
    }
}

/// Event row with aggregate counts, used by the event list
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
    pub member_count: i64,
    pub photo_count: i64,
}

/// Membership joined with user profile fields, for event detail responses
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    pub user_id: String,
    pub role: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub phone: String,
    pub joined_at: DateTime<Utc>,
}
