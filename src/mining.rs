//! Content mining for URLs hidden from the visible markup.
//!
//! On the static copy of a page the website link is often a `javascript:`
//! placeholder; the real target sits in a `data-*` attribute, an `onclick`
//! handler, or a JSON blob in an inline script. The miner reads all of those.

use dom_query::Selection;
use tracing::trace;

use crate::patterns::EMBEDDED_URL;
use crate::url_utils::{clean_url_candidate, is_admissible_url};
use crate::{dom, Options};

/// How many ancestors above the node have their attributes scanned.
const ANCESTOR_DEPTH: usize = 3;

/// First admissible absolute URL embedded anywhere in `text`.
#[must_use]
pub fn first_admissible_url(text: &str, options: &Options) -> Option<String> {
    let text = text.replace("\\/", "/");
    EMBEDDED_URL
        .find_iter(&text)
        .map(|m| clean_url_candidate(m.as_str()))
        .find(|candidate| is_admissible_url(candidate, options))
}

fn scan_attributes(sel: &Selection, options: &Options) -> Option<String> {
    dom::get_all_attributes(sel)
        .iter()
        .find_map(|(_, value)| first_admissible_url(value, options))
}

/// Mine `node`'s subtree for an admissible external URL.
///
/// Scans, in order: attribute values on the node and every descendant,
/// attributes of the nearest few ancestors, and the text of inline scripts
/// inside the subtree.
#[must_use]
pub fn mine(node: &Selection, options: &Options) -> Option<String> {
    if let Some(url) = scan_attributes(node, options) {
        trace!(%url, "mined from node attribute");
        return Some(url);
    }
    for descendant in node.select("*").nodes() {
        if let Some(url) = scan_attributes(&Selection::from(*descendant), options) {
            trace!(%url, "mined from descendant attribute");
            return Some(url);
        }
    }
    for ancestor in dom::ancestors(node).iter().take(ANCESTOR_DEPTH) {
        if let Some(url) = scan_attributes(ancestor, options) {
            trace!(%url, "mined from ancestor attribute");
            return Some(url);
        }
    }

    let mut scripts: Vec<Selection> = Vec::new();
    if dom::tag_name(node).as_deref() == Some("script") {
        scripts.push(node.clone());
    }
    scripts.extend(node.select("script").nodes().iter().map(|n| Selection::from(*n)));
    for script in &scripts {
        if let Some(url) = first_admissible_url(&dom::text_content(script), options) {
            trace!(%url, "mined from inline script");
            return Some(url);
        }
    }
    None
}
