//! Phone extraction.

use dom_query::Selection;

use super::{Chain, Page, PageContext, Strategy};
use crate::patterns::find_phone;
use crate::selector::{locate, narrow};
use crate::{dom, noise, Candidate, Options};

const LABELS: &[&str] = &["Phone", "Contact", "Contact Email"];

fn phone_container<'a>(page: &'a Page, options: &Options) -> Option<Selection<'a>> {
    let label = locate(&page.root(), LABELS)?;
    Some(narrow(&label, options))
}

fn has_digit(text: &str) -> bool {
    text.bytes().any(|b| b.is_ascii_digit())
}

/// Visible text of the first `tel:` link in the phone row, or its number when
/// the link reads "Call us".
fn tel_anchor(page: &Page, options: &Options) -> Option<Candidate> {
    let container = phone_container(page, options)?;
    let anchor = container.select(r#"a[href^="tel:"]"#);
    let node = anchor.nodes().first()?;
    let anchor = Selection::from(*node);
    let text = dom::text_content(&anchor).trim().to_string();
    let text = if has_digit(&text) {
        text
    } else {
        let href = anchor.attr("href").unwrap_or_default();
        let number = href.trim_start_matches("tel:").trim();
        if !has_digit(number) {
            return None;
        }
        number.to_string()
    };
    Some(Candidate::new(text, Some(node.id), "phone.tel_anchor"))
}

/// First phone-shaped run in the phone row's text.
fn pattern(page: &Page, options: &Options) -> Option<Candidate> {
    let container = phone_container(page, options)?;
    let text = dom::text_content(&container);
    let found = find_phone(&text)?;
    Some(Candidate::new(found.trim(), dom::node_id(&container), "phone.pattern"))
}

pub const STRATEGIES: &[Strategy] = &[
    Strategy::on_static("phone.tel_anchor", tel_anchor),
    Strategy::on_static("phone.pattern", pattern),
];

#[must_use]
pub fn accept(text: &str, options: &Options) -> Option<String> {
    noise::accept(Some(text.to_string()), options.max_field_len, options)
}

#[must_use]
pub fn chain() -> Chain<'static> {
    Chain::from_strategies("phone", STRATEGIES)
}

/// The profile's contact phone number as displayed.
#[must_use]
pub fn extract(ctx: &PageContext<'_>, options: &Options) -> Option<String> {
    chain().first(ctx, options, accept).map(|c| c.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone(html: &str) -> Option<String> {
        let page = Page::parse("https://filmfreeway.com/Example", html);
        extract(&PageContext::static_only(&page), &Options::default())
    }

    #[test]
    fn test_tel_anchor_in_definition_list() {
        let html = r#"<dl><dt>Phone</dt><dd><a href="tel:+14165551234">416-555-1234</a></dd></dl>"#;
        assert_eq!(phone(html), Some("416-555-1234".to_string()));
    }

    #[test]
    fn test_pattern_when_no_tel_link() {
        let html = r#"<ul><li><strong>Phone</strong> +44 (0)29 2022 1234</li></ul>"#;
        assert_eq!(phone(html), Some("+44 (0)29 2022 1234".to_string()));
    }

    #[test]
    fn test_contact_label_fallback() {
        let html = r#"<div class="box"><b>Contact</b><span>+1 212 555 0100</span></div>"#;
        assert_eq!(phone(html), Some("+1 212 555 0100".to_string()));
    }

    #[test]
    fn test_blank_tel_anchor_falls_through_to_pattern() {
        let html = r#"<dl><dt>Phone</dt><dd><a href="tel:"></a> 020 7946 0958</dd></dl>"#;
        assert_eq!(phone(html), Some("020 7946 0958".to_string()));
    }

    #[test]
    fn test_tel_anchor_without_digits_uses_href() {
        let html = r#"<dl><dt>Phone</dt><dd><a href="tel:+14165551234">Call us</a></dd></dl>"#;
        assert_eq!(phone(html), Some("+14165551234".to_string()));
    }

    #[test]
    fn test_postal_code_digits_stay_out_of_phone() {
        let html = r#"<ul><li><b>Phone</b> Toronto ON M5V 2T6 416-555-1234</li></ul>"#;
        assert_eq!(phone(html), Some("416-555-1234".to_string()));
    }

    #[test]
    fn test_no_label_no_phone() {
        assert_eq!(phone("<p>Call 416-555-1234</p>"), None);
    }
}
