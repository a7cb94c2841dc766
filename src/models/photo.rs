use chrono::{DateTime, Utc};
use serde::Serialize;

/// Photo row. `object_key` locates the binary in the photo store; `url` is
/// the API path clients fetch the bytes from.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventPhoto {
    pub id: String,
    pub event_id: String,
    pub uploader_id: String,
    pub url: String,
    pub object_key: String,
    pub caption: Option<String>,
    pub filename: String,
    pub size: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

impl EventPhoto {
    /// Build the store key for a photo. Event and photo ids are UUIDs; the
    /// filename is sanitized, so keys never escape the store root.
    pub fn build_object_key(event_id: &str, photo_id: &str, filename: &str) -> String {
        format!(
            "events/{}/{}-{}",
            event_id,
            photo_id,
            Self::sanitize_filename(filename)
        )
    }

    /// Reduce a client-supplied filename to a safe key segment: ASCII
    /// alphanumerics plus `.`, `-` and `_`, no leading dots, capped length.
    pub fn sanitize_filename(name: &str) -> String {
        let cleaned: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        let mut safe = cleaned.trim_start_matches('.').to_string();
        safe.truncate(80);
        if safe.is_empty() {
            safe.push_str("photo");
        }
        safe
    }
}
