//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::NaiveDate;
use url::Url;

use crate::utils::errors::Result;

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    email.contains('@') && email.contains('.') && email.len() > 5
}

/// Validate phone number format (basic validation)
pub fn is_valid_phone(phone: &str) -> bool {
    phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
        && phone.len() >= 10
}

/// Clip text to a maximum number of characters, on a character boundary
pub fn clip_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Trim an optional form field, blanks become None
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Join selected preferences into the stored comma-separated form.
/// Blank entries are dropped; an empty selection stores nothing.
pub fn join_preferences(preferences: &[String]) -> Option<String> {
    let cleaned: Vec<&str> = preferences
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.join(", "))
    }
}

/// Split the stored preference string back into a list
pub fn split_preferences(stored: &str) -> Vec<String> {
    stored
        .split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Normalize a user-supplied image reference.
///
/// Legacy rows carry values like `\media\ugc\pic.jpg` or `media/ugc/pic.jpg`;
/// the stored form uses forward slashes, exactly one leading slash, and a
/// single media prefix. Absolute http(s) URLs are validated and passed
/// through untouched. Blank input yields `None`.
pub fn normalize_legacy_image_url(raw: &str, media_prefix: &str) -> Result<Option<String>> {
    let mut url = raw.trim().replace('\\', "/");
    if url.is_empty() {
        return Ok(None);
    }

    if url.starts_with("http://") || url.starts_with("https://") {
        Url::parse(&url)?;
        return Ok(Some(url));
    }

    while url.starts_with("//") {
        url.remove(0);
    }
    if !url.starts_with('/') {
        url.insert(0, '/');
    }

    let doubled = format!("{}{}/", media_prefix, media_prefix);
    if url.starts_with(&doubled) {
        url.replace_range(..media_prefix.len(), "");
    }

    Ok(Some(url))
}

/// Sanitize filename for safe storage
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Generate a random alphanumeric string
pub fn generate_random_string(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                            abcdefghijklmnopqrstuvwxyz\
                            0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Format a date the way listing labels show it, e.g. "Mar 05, 2026"
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("student@campus.edu"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("a@b"));
    }

    #[test]
    fn test_clip_chars() {
        assert_eq!(clip_chars("hello", 10), "hello");
        assert_eq!(clip_chars("hello world", 5), "hello");
        assert_eq!(clip_chars("héllo", 2), "hé");
    }

    #[test]
    fn test_clean_optional_drops_blanks() {
        assert_eq!(clean_optional(None), None);
        assert_eq!(clean_optional(Some("  ".to_string())), None);
        assert_eq!(
            clean_optional(Some(" Pune ".to_string())),
            Some("Pune".to_string())
        );
    }

    #[test]
    fn test_join_preferences_drops_blanks() {
        let prefs = vec![
            "Tech Fest".to_string(),
            "  ".to_string(),
            "Cultural Fest".to_string(),
        ];
        assert_eq!(
            join_preferences(&prefs),
            Some("Tech Fest, Cultural Fest".to_string())
        );
        assert_eq!(join_preferences(&["".to_string()]), None);
    }

    #[test]
    fn test_split_preferences_round_trips() {
        let split = split_preferences("Tech Fest, Cultural Fest");
        assert_eq!(split, vec!["Tech Fest", "Cultural Fest"]);
    }

    #[test]
    fn test_normalize_backslashes_and_leading_slash() {
        let cleaned = normalize_legacy_image_url(r"media\ugc\pic.jpg", "/media").unwrap();
        assert_eq!(cleaned, Some("/media/ugc/pic.jpg".to_string()));
    }

    #[test]
    fn test_normalize_collapses_doubled_prefix() {
        let cleaned = normalize_legacy_image_url("/media/media/ugc/pic.jpg", "/media").unwrap();
        assert_eq!(cleaned, Some("/media/ugc/pic.jpg".to_string()));
    }

    #[test]
    fn test_normalize_strips_repeated_leading_slashes() {
        let cleaned = normalize_legacy_image_url("//media/ugc/pic.jpg", "/media").unwrap();
        assert_eq!(cleaned, Some("/media/ugc/pic.jpg".to_string()));
    }

    #[test]
    fn test_normalize_blank_is_none() {
        assert_eq!(normalize_legacy_image_url("   ", "/media").unwrap(), None);
    }

    #[test]
    fn test_normalize_accepts_absolute_urls() {
        let cleaned = normalize_legacy_image_url("https://cdn.example.com/p.jpg", "/media").unwrap();
        assert_eq!(cleaned, Some("https://cdn.example.com/p.jpg".to_string()));
        assert!(normalize_legacy_image_url("http://[broken", "/media").is_err());
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("fest photo (1).jpg"), "fest_photo__1_.jpg");
        assert_eq!(sanitize_filename("clean-name_2.png"), "clean-name_2.png");
    }

    #[test]
    fn test_format_short_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(format_short_date(date), "Mar 05, 2026");
    }
}
