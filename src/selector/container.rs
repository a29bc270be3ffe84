//! Container narrowing.
//!
//! A label is usually buried several wrappers deep. Taking the nearest block
//! blindly tends to pull in the login widget or cookie banner that shares the
//! wrapper, so narrowing walks up looking for the smallest block that is
//! specific to the field.

use dom_query::Selection;

use super::utils::{is_noise_container, is_one_of_tags, is_tag};
use crate::{dom, Options};

/// Smallest enclosing block likely to hold just the value for `node`.
///
/// In order: the `dd` following a `dt` label; the nearest `li`/`dd` ancestor;
/// the nearest `div` under the size limit that is not a noise container; the
/// nearest `section` under the size limit; the node itself.
#[must_use]
pub fn narrow<'a>(node: &Selection<'a>, options: &Options) -> Selection<'a> {
    if is_tag(node, "dt") {
        if let Some(dd) = dom::next_element_sibling(node).filter(|s| is_tag(s, "dd")) {
            return dd;
        }
    }

    let ancestors = dom::ancestors(node);
    let small = |sel: &Selection| dom::inner_html(sel).len() < options.container_html_limit;

    if let Some(item) = ancestors.iter().find(|a| is_one_of_tags(a, &["li", "dd"])) {
        return item.clone();
    }
    if let Some(block) = ancestors
        .iter()
        .find(|a| is_tag(a, "div") && !is_noise_container(a) && small(a))
    {
        return block.clone();
    }
    if let Some(section) = ancestors.iter().find(|a| is_tag(a, "section") && small(a)) {
        return section.clone();
    }
    node.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::utils::class;

    fn narrowed_class(html: &str, target: &str) -> String {
        let doc = dom::parse(html);
        let node = doc.select(target);
        class(&narrow(&node, &Options::default()))
    }

    #[test]
    fn test_dt_narrows_to_its_dd() {
        let doc = dom::parse("<div><dl><dt>Phone</dt><dd class=\"v\">416</dd></dl></div>");
        let dt = doc.select("dt");
        let out = narrow(&dt, &Options::default());
        assert!(is_tag(&out, "dd"));
        assert_eq!(dom::text_content(&out), "416".into());
    }

    #[test]
    fn test_list_item_is_preferred() {
        let html = r#"<div class="wrap"><ul><li class="row"><b id="t">Phone</b> 416</li></ul></div>"#;
        assert_eq!(narrowed_class(html, "#t"), "row");
    }

    #[test]
    fn test_noise_divs_are_skipped() {
        let html = r#"<div class="details"><div class="overlay-inner"><b id="t">Phone</b></div></div>"#;
        assert_eq!(narrowed_class(html, "#t"), "details");
    }

    #[test]
    fn test_oversized_divs_are_skipped() {
        let filler = "<p>filler text</p>".repeat(400);
        let html = format!(r#"<section class="sec"><div class="huge">{filler}<b id="t">Phone</b></div></section>"#);
        let doc = dom::parse(&html);
        let node = doc.select("#t");
        let options = Options::default();
        let out = narrow(&node, &options);
        assert!(is_tag(&out, "b"));

        let roomy = Options {
            container_html_limit: 100_000,
            ..Options::default()
        };
        assert_eq!(class(&narrow(&node, &roomy)), "huge");
    }

    #[test]
    fn test_falls_back_to_node() {
        let html = r#"<p><b id="t">Phone</b></p>"#;
        let doc = dom::parse(html);
        let node = doc.select("#t");
        assert!(is_tag(&narrow(&node, &Options::default()), "b"));
    }
}
