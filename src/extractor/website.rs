//! External website extraction.
//!
//! The profile's own site is shown as a "Visit website" link, usually next to
//! a globe icon. On the static page that link is often a `javascript:`
//! placeholder, so the chain falls back to other anchors in the row, content
//! mining, JSON-LD, the rendered page, and finally anything admissible at all.

use dom_query::Selection;

use super::{Chain, Page, PageContext, Strategy};
use crate::mining::mine;
use crate::selector::utils::{attr, class, fold, folded_text, is_hidden_or_noise, is_tag};
use crate::selector::{self, locate, narrow};
use crate::url_utils::{clean_url_candidate, is_admissible_url, is_js_placeholder};
use crate::{dom, metadata, noise, Candidate, Options};

const VISIT_LABEL: &str = "visit website";

/// Does the anchor say "visit website" in its title or text?
fn is_visit_anchor(sel: &Selection) -> bool {
    is_tag(sel, "a")
        && (fold(&attr(sel, "title")).contains(VISIT_LABEL) || folded_text(sel).contains(VISIT_LABEL))
}

fn is_globe_marker(sel: &Selection) -> bool {
    class(sel).to_ascii_lowercase().contains("globe") && !is_hidden_or_noise(sel)
}

fn is_visible_visit_anchor(sel: &Selection) -> bool {
    is_visit_anchor(sel) && !is_hidden_or_noise(sel)
}

/// Anchors at or below `sel`, in document order.
fn anchors_in<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    let mut out = Vec::new();
    if is_tag(sel, "a") {
        out.push(sel.clone());
    }
    out.extend(sel.select("a").nodes().iter().map(|n| Selection::from(*n)));
    out
}

/// Admissible href of an anchor, if it has one.
fn admissible_href(anchor: &Selection, options: &Options) -> Option<String> {
    let href = attr(anchor, "href");
    if is_js_placeholder(&href) {
        return None;
    }
    let href = clean_url_candidate(&href);
    is_admissible_url(&href, options).then_some(href)
}

fn candidate_from(anchor: &Selection, url: String, strategy: &'static str) -> Candidate {
    Candidate::new(url, dom::node_id(anchor), strategy)
}

/// The block holding the website link: a visit-website anchor or a globe
/// icon, narrowed to its container.
fn labeled_row<'a>(page: &'a Page, options: &Options) -> Option<Selection<'a>> {
    let root = page.root();
    let marker = selector::query(&root, is_visible_visit_anchor)
        .or_else(|| selector::query(&root, is_globe_marker))?;
    Some(narrow(&marker, options))
}

fn row_anchor(page: &Page, options: &Options) -> Option<Candidate> {
    let row = labeled_row(page, options)?;
    let anchors = anchors_in(&row);
    let preferred = anchors
        .iter()
        .find(|a| is_visit_anchor(a))
        .or_else(|| anchors.first())?;
    let url = admissible_href(preferred, options)?;
    Some(candidate_from(preferred, url, "website.row_anchor"))
}

fn row_other_anchor(page: &Page, options: &Options) -> Option<Candidate> {
    let row = labeled_row(page, options)?;
    anchors_in(&row).iter().find_map(|anchor| {
        admissible_href(anchor, options).map(|url| candidate_from(anchor, url, "website.row_other_anchor"))
    })
}

fn row_mined(page: &Page, options: &Options) -> Option<Candidate> {
    let row = labeled_row(page, options)?;
    mine(&row, options).map(|url| Candidate::new(url, dom::node_id(&row), "website.row_mined"))
}

/// Anchors anywhere that present themselves as the site link, for pages
/// with no visit-website row.
fn global_anchor(page: &Page, options: &Options) -> Option<Candidate> {
    if labeled_row(page, options).is_some() {
        return None;
    }
    let root = page.root();
    let by_text = anchors_in(&root).into_iter().find_map(|anchor| {
        let mentions_site = fold(&attr(&anchor, "title")).contains("website")
            || folded_text(&anchor).contains("website");
        if !mentions_site {
            return None;
        }
        admissible_href(&anchor, options).map(|url| candidate_from(&anchor, url, "website.global_anchor"))
    });
    by_text.or_else(|| {
        let label = locate(&root, &["Website"])?;
        let container = narrow(&label, options);
        anchors_in(&container).iter().find_map(|anchor| {
            admissible_href(anchor, options).map(|url| candidate_from(anchor, url, "website.global_anchor"))
        })
    })
}

fn json_ld(page: &Page, options: &Options) -> Option<Candidate> {
    metadata::first_admissible_link(page.document(), options).map(|url| Candidate::new(url, None, "website.json_ld"))
}

fn any_anchor(page: &Page, options: &Options) -> Option<Candidate> {
    anchors_in(&page.root())
        .iter()
        .filter(|a| !is_hidden_or_noise(a))
        .find_map(|anchor| admissible_href(anchor, options).map(|url| candidate_from(anchor, url, "website.any_anchor")))
}

fn document_mined(page: &Page, options: &Options) -> Option<Candidate> {
    mine(&page.root(), options).map(|url| Candidate::new(url, None, "website.document_mined"))
}

/// Website strategies, strongest first.
pub const STRATEGIES: &[Strategy] = &[
    Strategy::on_static("website.row_anchor", row_anchor),
    Strategy::on_static("website.row_other_anchor", row_other_anchor),
    Strategy::on_static("website.row_mined", row_mined),
    Strategy::on_static("website.global_anchor", global_anchor),
    Strategy::on_static("website.json_ld", json_ld),
    Strategy::on_rendered("website.rendered.row_anchor", row_anchor),
    Strategy::on_rendered("website.rendered.row_other_anchor", row_other_anchor),
    Strategy::on_rendered("website.rendered.row_mined", row_mined),
    Strategy::on_rendered("website.rendered.global_anchor", global_anchor),
    Strategy::on_rendered("website.rendered.json_ld", json_ld),
    Strategy::on_static("website.any_anchor", any_anchor),
    Strategy::on_static("website.document_mined", document_mined),
];

/// Keep a URL only if it is admissible and not noise.
#[must_use]
pub fn accept(text: &str, options: &Options) -> Option<String> {
    let url = noise::accept(Some(text.to_string()), options.max_url_len, options)?;
    is_admissible_url(&url, options).then_some(url)
}

#[must_use]
pub fn chain() -> Chain<'static> {
    Chain::from_strategies("website", STRATEGIES)
}

/// The profile's external website.
#[must_use]
pub fn extract(ctx: &PageContext<'_>, options: &Options) -> Option<String> {
    chain().first(ctx, options, accept).map(|c| c.text)
}
