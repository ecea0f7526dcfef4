//! String helpers for logs and error messages
//!
//! Credentials and remote response bodies end up in tracing output and error
//! text. These helpers shorten them without splitting multi-byte characters.

/// Number of leading bytes of a secret kept visible by [`mask_secret`]
const VISIBLE_SECRET_BYTES: usize = 6;

/// Safely truncate a string at a UTF-8 character boundary.
///
/// Returns a slice of at most `max_bytes` bytes.
///
/// # Example
/// ```
/// use twitter_oob_auth::utils::safe_truncate;
///
/// let text = "Status: 🔍 Active";
/// assert_eq!(safe_truncate(text, 10), "Status: ");
/// ```
#[inline]
#[must_use]
pub fn safe_truncate(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    let mut boundary = max_bytes;
    while boundary > 0 && !s.is_char_boundary(boundary) {
        boundary -= 1;
    }

    &s[..boundary]
}

/// Truncate a string for display, appending "..." if anything was cut.
#[must_use]
pub fn truncate_for_display(s: &str, max_bytes: usize) -> String {
    let truncated = safe_truncate(s, max_bytes);
    if truncated.len() < s.len() {
        format!("{truncated}...")
    } else {
        truncated.to_string()
    }
}

/// Mask a credential for logging.
///
/// Keeps a short prefix so two tokens can still be told apart in logs.
/// Short values are hidden completely.
///
/// # Example
/// ```
/// use twitter_oob_auth::utils::mask_secret;
///
/// assert_eq!(mask_secret("NPcudxy0yU5T3tBzho7iCotZ3cnetKwcTIRlX0iwRl0"), "NPcudx***");
/// assert_eq!(mask_secret("abc"), "***");
/// ```
#[must_use]
pub fn mask_secret(s: &str) -> String {
    if s.len() <= VISIBLE_SECRET_BYTES * 2 {
        return "***".to_string();
    }
    format!("{}***", safe_truncate(s, VISIBLE_SECRET_BYTES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_truncate_ascii() {
        let text = "Hello, World!";
        assert_eq!(safe_truncate(text, 7), "Hello, ");
        assert_eq!(safe_truncate(text, 100), text);
        assert_eq!(safe_truncate(text, 0), "");
    }

    #[test]
    fn test_safe_truncate_multibyte() {
        // 'é' is 2 bytes in UTF-8
        let text = "Café";
        assert_eq!(safe_truncate(text, 4), "Caf");
        assert_eq!(safe_truncate(text, 5), "Café");
    }

    #[test]
    fn test_truncate_for_display() {
        let text = "This is a long message";
        assert_eq!(truncate_for_display(text, 100), text);
        assert_eq!(truncate_for_display(text, 10), "This is a ...");
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "***");
        assert_eq!(mask_secret("short-token"), "***");
        assert_eq!(mask_secret("1234567890-abcdefgh"), "123456***");
    }

    #[test]
    fn test_mask_secret_multibyte_prefix() {
        // 'é' straddles the cut point and must not be split
        let masked = mask_secret("abcdeé-long-credential");
        assert_eq!(masked, "abcde***");
    }
}
