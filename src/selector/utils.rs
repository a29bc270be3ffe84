//! Utility functions for selector pattern matching
//!
//! Helper functions used by selector rules for attribute access, label text
//! normalization and noise-container checks.

use crate::dom;
use crate::patterns::{self, BLOCKY_CLASS};
use dom_query::Selection;

/// Tags whose text is never visible page content.
pub const INVISIBLE_TAGS: &[&str] = &["head", "title", "script", "style", "noscript", "template"];

// === Text Utilities ===

/// Whitespace-normalized, case-folded text used for label comparison.
///
/// # Example
///
/// ```rust
/// use rs_contactscrape::selector::utils;
///
/// assert_eq!(utils::fold("  Visit\n  Website "), "visit website");
/// ```
#[must_use]
pub fn fold(s: &str) -> String {
    patterns::collapse_whitespace(s).to_lowercase()
}

/// Folded text content of a selection.
#[inline]
#[must_use]
pub fn folded_text(sel: &Selection) -> String {
    fold(&dom::text_content(sel))
}

// === Element Attribute Helpers ===

/// Get element class attribute (empty string if missing)
#[inline]
#[must_use]
pub fn class(sel: &Selection) -> String {
    dom::class_name(sel).unwrap_or_default()
}

/// Get any attribute (empty string if missing)
#[inline]
#[must_use]
pub fn attr(sel: &Selection, name: &str) -> String {
    dom::get_attribute(sel, name).unwrap_or_default()
}

/// Get tag name (empty string if missing)
#[inline]
#[must_use]
pub fn tag(sel: &Selection) -> String {
    dom::tag_name(sel).unwrap_or_default()
}

// === Element Type Checks ===

/// Check if element has a specific tag name
#[inline]
#[must_use]
pub fn is_tag(sel: &Selection, expected: &str) -> bool {
    tag(sel) == expected
}

/// Check if element is one of the specified tags
///
/// # Example
///
/// ```rust
/// use rs_contactscrape::selector::utils;
/// use rs_contactscrape::dom;
///
/// let doc = dom::parse("<strong>Phone</strong>");
/// let strong = doc.select("strong");
///
/// assert!(utils::is_one_of_tags(&strong, &["strong", "b"]));
/// assert!(!utils::is_one_of_tags(&strong, &["div", "span", "p"]));
/// ```
#[inline]
#[must_use]
pub fn is_one_of_tags(sel: &Selection, tags: &[&str]) -> bool {
    let t = tag(sel);
    tags.contains(&t.as_str())
}

// === Noise Containers ===

/// Element whose class marks it as a modal, overlay, login widget and the like.
#[must_use]
pub fn is_noise_container(sel: &Selection) -> bool {
    BLOCKY_CLASS.is_match(&class(sel))
}

/// Element that is, or sits inside, a noise container or invisible tag.
#[must_use]
pub fn is_hidden_or_noise(sel: &Selection) -> bool {
    if is_noise_container(sel) || is_one_of_tags(sel, INVISIBLE_TAGS) {
        return true;
    }
    dom::ancestors(sel)
        .iter()
        .any(|a| is_noise_container(a) || is_one_of_tags(a, INVISIBLE_TAGS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    #[test]
    fn test_fold_normalizes_case_and_space() {
        assert_eq!(fold("PHONE"), "phone");
        assert_eq!(fold("\tContact \n Email "), "contact email");
        assert_eq!(fold(""), "");
    }

    #[test]
    fn test_attribute_helpers_default_to_empty() {
        let doc = dom::parse(r#"<div>no attributes</div>"#);
        let div = doc.select("div");

        assert_eq!(class(&div), "");
        assert_eq!(attr(&div, "title"), "");
        assert_eq!(tag(&div), "div");
        assert!(is_tag(&div, "div"));
    }

    #[test]
    fn test_noise_container_by_class() {
        let doc = dom::parse(r#"<div class="Modal"><p id="inner">Location</p></div><p id="outer">x</p>"#);

        assert!(is_noise_container(&doc.select("div.Modal")));
        assert!(is_hidden_or_noise(&doc.select("#inner")));
        assert!(!is_hidden_or_noise(&doc.select("#outer")));
    }

    #[test]
    fn test_invisible_tags_are_hidden() {
        let doc = dom::parse(r#"<html><head><title>Phone</title></head><body><script>var phone;</script></body></html>"#);

        assert!(is_hidden_or_noise(&doc.select("title")));
        assert!(is_hidden_or_noise(&doc.select("script")));
    }
}
