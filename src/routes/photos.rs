use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::access::require_event_access;
use crate::constants::{
    ALLOWED_IMAGE_TYPES, ERR_UNSUPPORTED_IMAGE, MAX_PHOTO_SIZE_BYTES, MAX_TEXT_LEN,
    WARN_PHOTO_SIZE_BYTES,
};
use crate::error::{AppError, Result};
use crate::models::EventPhoto;
use crate::session::AuthSession;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub filename: String,
    pub caption: Option<String>,
}

async fn fetch_photo(pool: &SqlitePool, photo_id: &str) -> Result<EventPhoto> {
    sqlx::query_as::<_, EventPhoto>("SELECT * FROM event_photos WHERE id = ?")
        .bind(photo_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::PhotoNotFound)
}

/// List an event's photos (members only), newest first.
pub async fn list_photos(
    State(state): State<AppState>,
    session: AuthSession,
    Path(event_id): Path<String>,
) -> Result<Json<Vec<EventPhoto>>> {
    require_event_access(&state.pool, &event_id, &session.user.id).await?;

    let photos = sqlx::query_as::<_, EventPhoto>(
        "SELECT * FROM event_photos WHERE event_id = ? ORDER BY created_at DESC",
    )
    .bind(&event_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(photos))
}

/// Upload a photo to an event
///
/// The request body carries the raw image bytes. The MIME type comes from
/// the Content-Type header, filename and optional caption from query
/// parameters. The object is written to the store before the row is
/// inserted, so a failed write leaves no dangling metadata.
pub async fn upload_photo(
    State(state): State<AppState>,
    session: AuthSession,
    Path(event_id): Path<String>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    bytes: Bytes,
) -> Result<(StatusCode, Json<EventPhoto>)> {
    // 1. Caller must be a member of the event
    require_event_access(&state.pool, &event_id, &session.user.id).await?;

    // 2. Content type must be an allowed image format
    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
        .unwrap_or_default();
    if !ALLOWED_IMAGE_TYPES.contains(&mime_type.as_str()) {
        tracing::warn!("Upload rejected: unsupported content type {:?}", mime_type);
        return Err(AppError::InvalidInput(ERR_UNSUPPORTED_IMAGE.to_string()));
    }

    // 3. Size checks
    if bytes.is_empty() {
        return Err(AppError::InvalidInput("Empty photo upload".to_string()));
    }
    if bytes.len() > MAX_PHOTO_SIZE_BYTES {
        tracing::warn!(
            "Photo too large from user {}: {} bytes (max: {})",
            session.user.id,
            bytes.len(),
            MAX_PHOTO_SIZE_BYTES
        );
        return Err(AppError::PayloadTooLarge);
    }
    if bytes.len() > WARN_PHOTO_SIZE_BYTES {
        tracing::warn!(
            "Large photo from user {}: {} bytes",
            session.user.id,
            bytes.len()
        );
    }

    // 4. Filename and caption
    let filename = params.filename.trim();
    if filename.is_empty() {
        return Err(AppError::InvalidInput("Missing filename".to_string()));
    }
    if let Some(caption) = &params.caption {
        if caption.len() > MAX_TEXT_LEN {
            return Err(AppError::InvalidInput("Caption too long".to_string()));
        }
    }

    // 5. Write the object, then the row
    let photo_id = Uuid::new_v4().to_string();
    let object_key = EventPhoto::build_object_key(&event_id, &photo_id, filename);
    let url = format!("/api/photos/{}/raw", photo_id);

    state.store.put(&object_key, &bytes).await?;

    sqlx::query(
        "INSERT INTO event_photos \
            (id, event_id, uploader_id, url, object_key, caption, filename, size, mime_type, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&photo_id)
    .bind(&event_id)
    .bind(&session.user.id)
    .bind(&url)
    .bind(&object_key)
    .bind(&params.caption)
    .bind(filename)
    .bind(bytes.len() as i64)
    .bind(&mime_type)
    .bind(Utc::now())
    .execute(&state.pool)
    .await?;

    let photo = fetch_photo(&state.pool, &photo_id).await?;

    tracing::info!(
        "Photo {} uploaded to event {} by user {} ({} bytes)",
        photo_id,
        event_id,
        session.user.id,
        bytes.len()
    );

    Ok((StatusCode::CREATED, Json(photo)))
}

/// Fetch the photo binary
///
/// Access follows the owning event's membership. The bytes come back with
/// the content type recorded at upload.
pub async fn get_photo_raw(
    State(state): State<AppState>,
    session: AuthSession,
    Path(photo_id): Path<String>,
) -> Result<impl IntoResponse> {
    let photo = fetch_photo(&state.pool, &photo_id).await?;
    require_event_access(&state.pool, &photo.event_id, &session.user.id).await?;

    let bytes = match state.store.read(&photo.object_key).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::error!(
                "Photo {} has a row but no object at key {}",
                photo.id,
                photo.object_key
            );
            return Err(AppError::PhotoNotFound);
        }
        Err(e) => return Err(AppError::Storage(e)),
    };

    Ok(([(header::CONTENT_TYPE, photo.mime_type)], bytes))
}

/// Delete a photo
///
/// Allowed for the uploader and for the event creator. The row goes first,
/// the stored object best-effort after.
pub async fn delete_photo(
    State(state): State<AppState>,
    session: AuthSession,
    Path(photo_id): Path<String>,
) -> Result<Json<Value>> {
    let photo = fetch_photo(&state.pool, &photo_id).await?;
    let event = require_event_access(&state.pool, &photo.event_id, &session.user.id).await?;

    if photo.uploader_id != session.user.id && !event.is_creator(&session.user.id) {
        return Err(AppError::CannotDeletePhoto);
    }

    sqlx::query("DELETE FROM event_photos WHERE id = ?")
        .bind(&photo_id)
        .execute(&state.pool)
        .await?;

    state.store.delete_quietly(&photo.object_key).await;

    tracing::info!("Photo {} deleted by user {}", photo_id, session.user.id);

    Ok(Json(json!({ "success": true })))
}
