//! Compiled regex patterns for field extraction.
//!
//! Fixed patterns are compiled once at first use using `LazyLock`; patterns
//! assembled from `Options` lists go through [`compiled`], which caches them.
//! Patterns are organized by the extractor that leans on them.

#![allow(clippy::expect_used)]

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use regex::Regex;

// =============================================================================
// Container Patterns
// =============================================================================

/// Matches class names of UI widgets whose text is never page content:
/// modals, overlays, dialogs, sign-up/login widgets, cookie banners.
///
/// `vex_` is the prefix of the vex dialog library used by the target site.
pub static BLOCKY_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(modal|overlay|dialog|signup|login|strongpassword|cookie|vex_)")
        .expect("BLOCKY_CLASS regex")
});

// =============================================================================
// Value Patterns
// =============================================================================

/// Matches a phone-shaped run: optional `+`, then 8+ characters of digits and
/// separators, starting and ending on a digit.
pub static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?\d[\d\-\s().]{6,}\d").expect("PHONE regex")
});

/// Matches an absolute http(s) URL embedded in attribute or script text.
pub static EMBEDDED_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s"'<>\\]+"#).expect("EMBEDDED_URL regex")
});

/// Matches a string made only of ASCII digits.
pub static DIGITS_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+$").expect("DIGITS_ONLY regex")
});

// =============================================================================
// Address Shape Patterns
// =============================================================================

/// Matches street-ish tokens: street types, suite/unit markers, `#12`.
pub static STREET_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\b(st|street|ave|avenue|rd|road|blvd|boulevard|square|plaza|drive|dr|lane|ln|way|suite|unit|floor|zip|postal)\b|#\s*\d)",
    )
    .expect("STREET_TOKEN regex")
});

/// Matches postal codes: Canadian (`M5V 2T6`), US ZIP (`10001`, `10001-1234`)
/// and UK outward/inward pairs (`SW1A 1AA`).
pub static POSTAL_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\b[a-z]\d[a-z]\s?\d[a-z]\d\b|\b\d{5}(-\d{4})?\b|\b[a-z]{1,2}\d[a-z\d]?\s\d[a-z]{2}\b)",
    )
    .expect("POSTAL_CODE regex")
});

// =============================================================================
// Text Cleaning Patterns
// =============================================================================

/// Matches multiple whitespace characters for normalization.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex")
});

/// Collapses whitespace runs to one space and trims the ends.
#[must_use]
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_NORMALIZE.replace_all(s, " ").trim().to_string()
}

/// First phone-shaped run in `text` that does not start in the middle of a
/// word, so `M5V 2T6 416-555-1234` yields `416-555-1234`, not `6 416-...`.
#[must_use]
pub fn find_phone(text: &str) -> Option<&str> {
    let mut from = 0;
    while let Some(m) = PHONE.find_at(text, from) {
        let glued = text[..m.start()]
            .chars()
            .next_back()
            .is_some_and(char::is_alphanumeric);
        if !glued {
            return Some(m.as_str());
        }
        from = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

// =============================================================================
// Runtime Patterns
// =============================================================================

/// Patterns built from `Options` data, compiled once per distinct source.
static COMPILED: LazyLock<Mutex<HashMap<String, Regex>>> = LazyLock::new(|| Mutex::new(HashMap::new()));

/// Upper bound on cached runtime patterns.
const COMPILED_CAPACITY: usize = 256;

/// Compile `pattern`, reusing an earlier compilation of the same source.
///
/// Returns `None` for an invalid pattern.
#[must_use]
pub fn compiled(pattern: &str) -> Option<Regex> {
    if let Ok(cache) = COMPILED.lock() {
        if let Some(re) = cache.get(pattern) {
            return Some(re.clone());
        }
    }
    let re = Regex::new(pattern).ok()?;
    if let Ok(mut cache) = COMPILED.lock() {
        if cache.len() >= COMPILED_CAPACITY {
            cache.clear();
        }
        cache.insert(pattern.to_string(), re.clone());
    }
    Some(re)
}

// =============================================================================
// Fetch Patterns
// =============================================================================

/// Matches the `api_key` query parameter of a proxy URL.
pub static API_KEY_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"api_key=[^&]+").expect("API_KEY_PARAM regex")
});

/// Replace the proxy API key in `s` with `***`.
#[must_use]
pub fn mask_key(s: &str) -> String {
    API_KEY_PARAM.replace_all(s, "api_key=***").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocky_class_matches_widget_containers() {
        assert!(BLOCKY_CLASS.is_match("Modal"));
        assert!(BLOCKY_CLASS.is_match("ModalLogin-content"));
        assert!(BLOCKY_CLASS.is_match("cookie-banner"));
        assert!(BLOCKY_CLASS.is_match("vex_content"));
        assert!(!BLOCKY_CLASS.is_match("festival-details"));
    }

    #[test]
    fn phone_matches_separated_digits() {
        assert!(PHONE.is_match("416-555-1234"));
        assert!(PHONE.is_match("+1 (416) 555 1234"));
        assert!(!PHONE.is_match("Suite 12"));
        assert!(!PHONE.is_match("M5V 2T6"));
    }

    #[test]
    fn find_phone_skips_runs_glued_to_a_word() {
        assert_eq!(find_phone("Toronto ON M5V 2T6 416-555-1234"), Some("416-555-1234"));
        assert_eq!(find_phone("Tel: +1 (416) 555-1234"), Some("+1 (416) 555-1234"));
        assert_eq!(find_phone("Suite 12, M5V 2T6"), None);
    }

    #[test]
    fn compiled_patterns_are_reused() {
        let first = compiled(r"(?i)\bfestival_id\b").map(|re| re.as_str().to_string());
        let second = compiled(r"(?i)\bfestival_id\b").map(|re| re.as_str().to_string());
        assert_eq!(first, second);
        assert!(compiled("(unclosed").is_none());
    }

    #[test]
    fn embedded_url_stops_at_quotes_and_backslashes() {
        let text = r#"{"href":"https://example.org/a?b=1","x":"y"}"#;
        let m = EMBEDDED_URL.find(text).map(|m| m.as_str());
        assert_eq!(m, Some("https://example.org/a?b=1"));
    }

    #[test]
    fn address_shape_tokens() {
        assert!(STREET_TOKEN.is_match("123 Queen St W"));
        assert!(STREET_TOKEN.is_match("Unit #4"));
        assert!(!STREET_TOKEN.is_match("first festival"));
        assert!(POSTAL_CODE.is_match("Toronto ON M5V 2T6"));
        assert!(POSTAL_CODE.is_match("New York, NY 10001"));
        assert!(POSTAL_CODE.is_match("London SW1A 1AA"));
    }

    #[test]
    fn collapse_whitespace_trims_and_joins() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
    }

    #[test]
    fn mask_key_hides_only_the_key() {
        let url = "https://api.scraperapi.com/?api_key=s3cr3t&url=https%3A%2F%2Ffilmfreeway.com%2FA&render=true";
        let masked = mask_key(url);
        assert!(!masked.contains("s3cr3t"));
        assert!(masked.contains("api_key=***&url="));
        assert!(masked.ends_with("render=true"));
    }
}
