/// Phone number of the admin account. Admin routes compare the session
/// user's phone against this value in plaintext; there is no role column.
pub const ADMIN_PHONE: &str = "015175558020";

/// Maximum photo upload size in bytes (10MB)
/// Typical phone camera JPEG: 2-5MB
pub const MAX_PHOTO_SIZE_BYTES: usize = 10_485_760;

/// Photo sizes above this are logged for monitoring (5MB)
pub const WARN_PHOTO_SIZE_BYTES: usize = 5_242_880;

/// MIME types accepted for photo uploads
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/gif",
    "image/heic",
    "image/heif",
];

/// Session token lifetime in seconds (30 days)
pub const SESSION_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Maximum length of user and event names
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of event descriptions, locations and photo captions
pub const MAX_TEXT_LEN: usize = 1000;

// =============================================================================
// Error Messages
// =============================================================================

/// Error message for phone numbers that fail validation after normalization
pub const ERR_INVALID_PHONE: &str =
    "Invalid phone number - expected a leading 0 followed by 9 to 14 digits";

/// Error message for empty or over-long names
pub const ERR_INVALID_NAME: &str = "Name must be between 1 and 100 characters";

/// Error message for missing or non-image content types on photo upload
pub const ERR_UNSUPPORTED_IMAGE: &str = "Unsupported image type";
