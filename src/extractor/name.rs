//! Profile name: the first `h1`, else the document title.

use dom_query::Selection;

use super::{Chain, Page, PageContext, Strategy};
use crate::patterns::collapse_whitespace;
use crate::{dom, noise, Candidate, Options};

fn first_text(page: &Page, css: &str, strategy: &'static str) -> Option<Candidate> {
    let selection = page.document().select(css);
    let node = selection.nodes().first()?;
    let text = collapse_whitespace(&dom::text_content(&Selection::from(*node)));
    Some(Candidate::new(text, Some(node.id), strategy))
}

fn heading(page: &Page, _: &Options) -> Option<Candidate> {
    first_text(page, "h1", "name.heading")
}

fn title(page: &Page, _: &Options) -> Option<Candidate> {
    first_text(page, "title", "name.title")
}

pub const STRATEGIES: &[Strategy] = &[
    Strategy::on_static("name.heading", heading),
    Strategy::on_static("name.title", title),
];

#[must_use]
pub fn accept(text: &str, options: &Options) -> Option<String> {
    noise::accept(Some(text.to_string()), options.max_field_len, options)
}

#[must_use]
pub fn chain() -> Chain<'static> {
    Chain::from_strategies("name", STRATEGIES)
}

#[must_use]
pub fn extract(ctx: &PageContext<'_>, options: &Options) -> Option<String> {
    chain().first(ctx, options, accept).map(|c| c.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(html: &str) -> Option<String> {
        let page = Page::parse("https://filmfreeway.com/Example", html);
        extract(&PageContext::static_only(&page), &Options::default())
    }

    #[test]
    fn test_heading_wins() {
        let html = "<html><head><title>Fest - FilmFreeway</title></head><body><h1>\n  Commffest   Global\n</h1></body></html>";
        assert_eq!(name(html), Some("Commffest Global".to_string()));
    }

    #[test]
    fn test_title_fallback() {
        let html = "<html><head><title>Fest - FilmFreeway</title></head><body><h1> </h1></body></html>";
        assert_eq!(name(html), Some("Fest - FilmFreeway".to_string()));
    }

    #[test]
    fn test_absent() {
        assert_eq!(name("<p>x</p>"), None);
    }
}
