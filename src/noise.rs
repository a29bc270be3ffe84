//! Noise filtering for extracted values.
//!
//! Scraped pages on the target site carry framework bootstrap JSON, login
//! modals and password-strength widgets inline. When a heuristic lands on one
//! of those instead of real content, the string still "looks" like text. The
//! filter below is the last gate before a value enters a `Record`.

use tracing::debug;

use crate::Options;

/// Returns true if `value` is absent, empty, longer than `max_len` characters,
/// or contains one of the configured junk markers.
#[must_use]
pub fn is_noise(value: Option<&str>, max_len: usize, options: &Options) -> bool {
    let Some(value) = value else {
        return true;
    };
    let value = value.trim();
    if value.is_empty() {
        return true;
    }
    if value.chars().count() > max_len {
        return true;
    }
    options
        .noise_markers
        .iter()
        .any(|marker| value.contains(marker.as_str()))
}

/// Trims `value` and returns it only if it is not noise.
///
/// Rejected values become `None`, never an empty string.
#[must_use]
pub fn accept(value: Option<String>, max_len: usize, options: &Options) -> Option<String> {
    let trimmed = value.as_deref().map(str::trim);
    if is_noise(trimmed, max_len, options) {
        if let Some(v) = trimmed.filter(|v| !v.is_empty()) {
            debug!(len = v.len(), "rejected noisy value");
        }
        return None;
    }
    trimmed.map(str::to_string)
}
