use lazy_static::lazy_static;
use regex::Regex;

use crate::error::AppError;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref URL_RE: Regex =
        Regex::new(r"^https?://(www\.)?[a-zA-Z0-9\-._~:/?#\[\]@!$&'()*+,;=%]+$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_url(url: &str) -> bool {
    URL_RE.is_match(url)
}

/// Lower-cased, trimmed login key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Text fields (names, captions, bios) are 2 to 30 characters.
pub fn check_text(value: &str, field: &str) -> Result<(), AppError> {
    let len = value.chars().count();
    if (2..=30).contains(&len) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "{field} must be between 2 and 30 characters"
        )))
    }
}

pub fn check_url(value: &str, field: &str) -> Result<(), AppError> {
    if is_valid_url(value) {
        Ok(())
    } else {
        Err(AppError::validation(format!("{field} must be a valid URL")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn url_shapes() {
        assert!(is_valid_url("https://example.com/photo.jpg"));
        assert!(is_valid_url("http://www.example.com/a?b=c#d"));
        assert!(!is_valid_url("ftp://example.com/photo.jpg"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("https://exa mple.com"));
    }

    #[test]
    fn text_length_counts_chars_not_bytes() {
        assert!(check_text("Жак", "name").is_ok());
        assert!(check_text("a", "name").is_err());
        assert!(check_text(&"x".repeat(31), "name").is_err());
        assert!(check_text(&"x".repeat(30), "name").is_ok());
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  A@B.Com "), "a@b.com");
    }
}
