//! Numeric identifier extraction.
//!
//! The site stamps its internal id on a data attribute and repeats it in the
//! bootstrap scripts. Attribute names and script keys come from `Options`.

use dom_query::Selection;
use regex::Regex;

use super::{Chain, Page, PageContext, Strategy};
use crate::patterns::{compiled, DIGITS_ONLY};
use crate::{dom, noise, Candidate, Options};

/// Digits-only value of the identifier attribute on any element.
fn data_attribute(page: &Page, options: &Options) -> Option<Candidate> {
    let name = options.identifier_attribute.as_str();
    page.root().select("*").nodes().iter().find_map(|node| {
        let value = dom::get_attribute(&Selection::from(*node), name)?;
        let value = value.trim();
        DIGITS_ONLY
            .is_match(value)
            .then(|| Candidate::new(value, Some(node.id), "identifier.data_attribute"))
    })
}

/// The attribute as written in the raw markup, for ids the parser dropped.
fn raw_markup(page: &Page, options: &Options) -> Option<Candidate> {
    let pattern = format!(
        r#"(?i){}\s*=\s*["'](\d+)["']"#,
        regex::escape(&options.identifier_attribute)
    );
    let re = compiled(&pattern)?;
    let caps = re.captures(page.html())?;
    Some(Candidate::new(&caps[1], None, "identifier.raw_markup"))
}

/// JSON-style (`"festival_id": 123`) or assignment-style (`festivalId = 123`)
/// keys inside inline scripts.
fn script_keys(page: &Page, options: &Options) -> Option<Candidate> {
    let patterns: Vec<Regex> = options
        .identifier_script_keys
        .iter()
        .filter_map(|key| {
            compiled(&format!(
                r#"(?i)["']?{}["']?\s*[:=]\s*["']?(\d+)"#,
                regex::escape(key)
            ))
        })
        .collect();

    for node in page.document().select("script").nodes() {
        let text = dom::text_content(&Selection::from(*node));
        for re in &patterns {
            if let Some(caps) = re.captures(&text) {
                return Some(Candidate::new(&caps[1], Some(node.id), "identifier.script_keys"));
            }
        }
    }
    None
}

pub const STRATEGIES: &[Strategy] = &[
    Strategy::on_static("identifier.data_attribute", data_attribute),
    Strategy::on_static("identifier.raw_markup", raw_markup),
    Strategy::on_static("identifier.script_keys", script_keys),
];

#[must_use]
pub fn accept(text: &str, options: &Options) -> Option<String> {
    noise::accept(Some(text.to_string()), options.max_field_len, options)
}

#[must_use]
pub fn chain() -> Chain<'static> {
    Chain::from_strategies("identifier", STRATEGIES)
}

/// The site's numeric id for the profile.
#[must_use]
pub fn extract(ctx: &PageContext<'_>, options: &Options) -> Option<String> {
    chain().first(ctx, options, accept).map(|c| c.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identifier(html: &str) -> Option<String> {
        let page = Page::parse("https://filmfreeway.com/Example", html);
        extract(&PageContext::static_only(&page), &Options::default())
    }

    #[test]
    fn test_data_attribute() {
        let html = r#"<div data-festival-id=" 4821 "><button>Submit</button></div>"#;
        assert_eq!(identifier(html), Some("4821".to_string()));
    }

    #[test]
    fn test_non_numeric_attribute_is_skipped() {
        let html = r#"<div data-festival-id="abc"></div><span data-festival-id="77"></span>"#;
        assert_eq!(identifier(html), Some("77".to_string()));
    }

    #[test]
    fn test_json_style_script_key() {
        let html = r#"<script>window.props = {"festival_id": "9001", "name": "x"};</script>"#;
        assert_eq!(identifier(html), Some("9001".to_string()));
    }

    #[test]
    fn test_assignment_style_script_key() {
        let html = r#"<script>var festivalId = 314;</script>"#;
        assert_eq!(identifier(html), Some("314".to_string()));
    }

    #[test]
    fn test_raw_markup_regex() {
        let options = Options::default();
        let page = Page::parse(
            "https://filmfreeway.com/Example",
            r#"<template><div data-festival-id='555'></div></template>"#,
        );
        let found = raw_markup(&page, &options).map(|c| c.text);
        assert_eq!(found, Some("555".to_string()));
    }

    #[test]
    fn test_configured_keys() {
        let options = Options {
            identifier_attribute: "data-profile-id".to_string(),
            identifier_script_keys: vec!["profileId".to_string()],
            ..Options::default()
        };
        let page = Page::parse("https://example.com/p", r#"<script>profileId: 42</script>"#);
        assert_eq!(extract(&PageContext::static_only(&page), &options), Some("42".to_string()));
    }

    #[test]
    fn test_absent() {
        assert_eq!(identifier("<p>no id here 12345</p>"), None);
    }
}
