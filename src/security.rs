use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::phone::normalize_phone;

type HmacSha256 = Hmac<Sha256>;

/// A parsed bearer credential.
///
/// Two wire formats are accepted on the Authorization header:
/// - `Session`: `{user_id}.{expiry}.{signature}`, issued by the auth routes
///   and signed with the server-side session secret.
/// - `Legacy`: standard base64 of the bare phone number. The original web
///   client kept `btoa(phone)` in localStorage and sent it as a bearer
///   token; existing installations still do.
///
/// Both resolve to the same session object in [`crate::session`]; nothing
/// downstream of the parser knows which format arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BearerToken {
    Session { user_id: String },
    Legacy { phone: String },
}

/// Issue a signed session token for a user id, valid for `ttl_secs` seconds.
///
/// Token layout is `{user_id}.{expiry}.{signature}` where the signature is
/// hex-encoded HMAC-SHA256 over `{user_id}.{expiry}`. User ids are UUIDs and
/// never contain `.`, so the layout is unambiguous.
pub fn issue_session_token(user_id: &str, ttl_secs: i64, secret: &str) -> String {
    let expiry = chrono::Utc::now().timestamp() + ttl_secs;
    let payload = format!("{}.{}", user_id, expiry);
    let signature = sign(&payload, secret);
    format!("{}.{}", payload, signature)
}

/// Parse and verify a bearer token in either accepted format.
///
/// Tokens containing a `.` are session tokens and must carry a valid
/// signature and an unexpired timestamp. Everything else is tried as the
/// legacy format; the decoded phone number is normalized before lookup.
pub fn parse_bearer_token(token: &str, secret: &str) -> Option<BearerToken> {
    if token.contains('.') {
        verify_session_token(token, secret).map(|user_id| BearerToken::Session { user_id })
    } else {
        decode_legacy_token(token).map(|phone| BearerToken::Legacy { phone })
    }
}

/// Verify a signed session token, returning the user id when valid.
fn verify_session_token(token: &str, secret: &str) -> Option<String> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let (user_id, expiry_raw, signature) = (parts[0], parts[1], parts[2]);

    let payload = format!("{}.{}", user_id, expiry_raw);
    if !verify_signature(&payload, signature, secret) {
        tracing::warn!("Session token with invalid signature");
        return None;
    }

    let expiry: i64 = expiry_raw.parse().ok()?;
    if expiry <= chrono::Utc::now().timestamp() {
        tracing::debug!("Expired session token");
        return None;
    }

    Some(user_id.to_string())
}

/// Decode the legacy token format: base64 of the bare phone number.
fn decode_legacy_token(token: &str) -> Option<String> {
    let bytes = BASE64_STANDARD.decode(token.trim()).ok()?;
    let raw = String::from_utf8(bytes).ok()?;
    let phone = normalize_phone(&raw);
    if phone.is_empty() {
        return None;
    }
    Some(phone)
}

/// Compute the hex HMAC-SHA256 signature over a payload
fn sign(payload: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a hex HMAC-SHA256 signature over a payload
fn verify_signature(payload: &str, signature: &str, secret: &str) -> bool {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            tracing::error!("Failed to create HMAC instance");
            return false;
        }
    };

    mac.update(payload.as_bytes());

    let sig_bytes = match hex::decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!("Invalid hex signature format");
            return false;
        }
    };

    mac.verify_slice(&sig_bytes).is_ok()
}
