//! Phone number normalization.
//!
//! Every phone number in the database is stored in the normalized form
//! produced here, so lookups (login, invites, user search) must run their
//! input through [`normalize_phone`] before touching the `users` table.

/// Normalize a phone number to the stored leading-zero local form.
///
/// The input is first reduced to digits plus a leading `+`, then rewritten:
/// - `+4915…` -> `015…`
/// - `+491…`  -> `01…`
/// - `4915…`  -> `015…`
/// - `491…`   -> `01…`
/// - anything already starting `01` passes through
/// - bare digit strings of 10+ digits get a leading `0` prepended
/// - everything else passes through unchanged
///
/// This function never fails; it can return a string that is not a valid
/// phone number. [`is_valid_phone`] is the gate applied before persisting.
///
/// The rewrite table is deliberately left as-is, quirks included: it only
/// understands German country codes, and numbers like `0511234567` (no `01`
/// prefix) pick up an extra leading zero. Stored data depends on this exact
/// behavior, so do not "fix" it.
pub fn normalize_phone(input: &str) -> String {
    // Keep digits; keep a '+' only while nothing has been kept yet.
    let mut cleaned = String::with_capacity(input.len());
    for c in input.chars() {
        if c.is_ascii_digit() {
            cleaned.push(c);
        } else if c == '+' && cleaned.is_empty() {
            cleaned.push('+');
        }
    }

    if let Some(rest) = cleaned.strip_prefix("+4915") {
        format!("015{}", rest)
    } else if let Some(rest) = cleaned.strip_prefix("+491") {
        format!("01{}", rest)
    } else if let Some(rest) = cleaned.strip_prefix("4915") {
        format!("015{}", rest)
    } else if let Some(rest) = cleaned.strip_prefix("491") {
        format!("01{}", rest)
    } else if cleaned.starts_with("01") {
        cleaned
    } else if cleaned.len() >= 10 && cleaned.chars().all(|c| c.is_ascii_digit()) {
        format!("0{}", cleaned)
    } else {
        cleaned
    }
}

/// Check a normalized phone number against the persistence rule: a leading
/// `0` followed by 9 to 14 digits (`^0\d{9,14}$`).
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() >= 10
        && phone.len() <= 15
        && phone.starts_with('0')
        && phone.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plus_49_mobile() {
        assert_eq!(normalize_phone("+4915153352436"), "015153352436");
    }

    #[test]
    fn test_normalize_bare_49_mobile() {
        assert_eq!(normalize_phone("4915153352436"), "015153352436");
    }

    #[test]
    fn test_normalize_plus_49_non_15_prefix() {
        assert_eq!(normalize_phone("+491761234567"), "01761234567");
        assert_eq!(normalize_phone("491761234567"), "01761234567");
    }

    #[test]
    fn test_normalize_local_form_passes_through() {
        assert_eq!(normalize_phone("01511234567"), "01511234567");
    }

    #[test]
    fn test_normalize_prepends_zero_to_bare_digits() {
        assert_eq!(normalize_phone("1234567890"), "01234567890");
        // Locked quirk: a number starting 0 but not 01 is treated as bare
        // digits and collects a second zero.
        assert_eq!(normalize_phone("0511234567"), "00511234567");
    }

    #[test]
    fn test_normalize_strips_formatting() {
        assert_eq!(normalize_phone("+49 151 5335-2436"), "015153352436");
        assert_eq!(normalize_phone("(0151) 123 4567"), "01511234567");
    }

    #[test]
    fn test_normalize_keeps_only_leading_plus() {
        assert_eq!(normalize_phone("4+915153352436"), "015153352436");
    }

    #[test]
    fn test_normalize_non_german_passes_through() {
        // Unknown country codes are left alone; the validator rejects them.
        assert_eq!(normalize_phone("+15551234567"), "+15551234567");
        assert!(!is_valid_phone(&normalize_phone("+15551234567")));
    }

    #[test]
    fn test_normalize_short_input_passes_through() {
        assert_eq!(normalize_phone("12345"), "12345");
        assert_eq!(normalize_phone(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent_on_normalized_numbers() {
        for input in [
            "+4915153352436",
            "4915153352436",
            "01511234567",
            "1234567890",
            "+49 171 9876543",
        ] {
            let once = normalize_phone(input);
            assert_eq!(normalize_phone(&once), once, "not idempotent for {}", input);
        }
    }

    #[test]
    fn test_is_valid_phone_accepts_stored_forms() {
        assert!(is_valid_phone("0123456789")); // minimum: 0 + 9 digits
        assert!(is_valid_phone("015153352436"));
        assert!(is_valid_phone("012345678901234")); // maximum: 0 + 14 digits
    }

    #[test]
    fn test_is_valid_phone_rejects_bad_forms() {
        assert!(!is_valid_phone("012345678")); // too short
        assert!(!is_valid_phone("0123456789012345")); // too long
        assert!(!is_valid_phone("1234567890")); // no leading zero
        assert!(!is_valid_phone("+4915153352436")); // not normalized
        assert!(!is_valid_phone("01511abc567")); // non-digits
        assert!(!is_valid_phone(""));
    }
}
