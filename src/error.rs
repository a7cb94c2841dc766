use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("No account for this phone number")]
    UnknownPhone,

    #[error("Admin access required")]
    AdminOnly,

    #[error("Not a member of this event")]
    NotMember,

    #[error("Only the event creator can do this")]
    NotCreator,

    #[error("The creator cannot leave their own event")]
    CreatorCannotLeave,

    #[error("Only the uploader or the event creator can delete this photo")]
    CannotDeletePhoto,

    #[error("User not found")]
    UserNotFound,

    #[error("Event not found")]
    EventNotFound,

    #[error("Photo not found")]
    PhotoNotFound,

    #[error("User is not a member of this event")]
    MemberNotFound,

    #[error("An account with this phone number already exists")]
    UserAlreadyExists,

    #[error("Phone number already in use")]
    PhoneTaken,

    #[error("Already a member of this event")]
    AlreadyMember,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Payload too large")]
    PayloadTooLarge,
}

/// Implement IntoResponse to convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Storage(ref e) => {
                tracing::error!("Storage error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            AppError::UnknownPhone => (
                StatusCode::UNAUTHORIZED,
                "No account for this phone number",
            ),
            AppError::AdminOnly => (StatusCode::FORBIDDEN, "Admin access required"),
            AppError::NotMember => (StatusCode::FORBIDDEN, "Not a member of this event"),
            AppError::NotCreator => (
                StatusCode::FORBIDDEN,
                "Only the event creator can do this",
            ),
            AppError::CreatorCannotLeave => (
                StatusCode::FORBIDDEN,
                "The creator cannot leave their own event",
            ),
            AppError::CannotDeletePhoto => (
                StatusCode::FORBIDDEN,
                "Only the uploader or the event creator can delete this photo",
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
            AppError::EventNotFound => (StatusCode::NOT_FOUND, "Event not found"),
            AppError::PhotoNotFound => (StatusCode::NOT_FOUND, "Photo not found"),
            AppError::MemberNotFound => (
                StatusCode::NOT_FOUND,
                "User is not a member of this event",
            ),
            AppError::UserAlreadyExists => (
                StatusCode::CONFLICT,
                "An account with this phone number already exists",
            ),
            AppError::PhoneTaken => (StatusCode::CONFLICT, "Phone number already in use"),
            AppError::AlreadyMember => (StatusCode::CONFLICT, "Already a member of this event"),
            AppError::InvalidInput(ref msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Photo exceeds the maximum allowed size",
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;
