//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate so the extractors read in terms of
//! tags, attributes, ancestors and visible text rather than node plumbing.

// Re-export core types for external use
pub use dom_query::{Document, NodeId, Selection};

// Re-export StrTendril for external use
pub use tendril::StrTendril;

// === Attribute Operations ===

/// Get element class attribute
#[inline]
#[must_use]
pub fn class_name(sel: &Selection) -> Option<String> {
    sel.attr("class").map(|s| s.to_string())
}

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Get all attributes as key-value pairs
///
/// Returns empty vector if node has no attributes or if selection is empty.
#[must_use]
pub fn get_all_attributes(sel: &Selection) -> Vec<(String, String)> {
    sel.nodes()
        .first()
        .map(|node| {
            node.attrs()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_string())
}

/// Id of the first node in the selection.
#[inline]
#[must_use]
pub fn node_id(sel: &Selection) -> Option<NodeId> {
    sel.nodes().first().map(|n| n.id)
}

// === Text Content ===

/// Get all text content of node and descendants
///
/// Text of adjacent nodes is concatenated with no separator, the way the
/// browser's `textContent` does.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Non-blank text nodes below the selection, in document order.
///
/// Unlike [`text_content`], fragments stay separate so callers can join them
/// with a space: `<dt>Phone</dt><dd>416</dd>` gives `["Phone", "416"]`.
#[must_use]
pub fn text_fragments(sel: &Selection) -> Vec<String> {
    let mut out = Vec::new();
    for root in sel.nodes() {
        for node in root.descendants() {
            if !node.is_text() {
                continue;
            }
            let text = node.text();
            if !text.trim().is_empty() {
                out.push(text.to_string());
            }
        }
    }
    out
}

/// Get inner HTML content
#[inline]
#[must_use]
pub fn inner_html(sel: &Selection) -> StrTendril {
    sel.inner_html()
}

/// Get outer HTML content
#[inline]
#[must_use]
pub fn outer_html(sel: &Selection) -> StrTendril {
    sel.html()
}

// === Tree Navigation ===

/// All element ancestors, nearest first.
#[must_use]
pub fn ancestors<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    let mut out = Vec::new();
    let mut current = sel.nodes().first().and_then(dom_query::NodeRef::parent);
    while let Some(node) = current {
        if node.is_element() {
            out.push(Selection::from(node));
        }
        current = node.parent();
    }
    out
}

/// Get next element sibling (skipping text nodes)
#[must_use]
pub fn next_element_sibling<'a>(sel: &Selection<'a>) -> Option<Selection<'a>> {
    sel.nodes().first().and_then(|node| {
        let mut sibling = node.next_sibling();
        while let Some(s) = sibling {
            if s.is_element() {
                return Some(Selection::from(s));
            }
            sibling = s.next_sibling();
        }
        None
    })
}

/// Non-blank text of the sibling nodes directly before `sel`, nearest last.
///
/// Walks back over text and inline elements until a block-level element or
/// the start of the parent.
#[must_use]
pub fn preceding_text(sel: &Selection) -> String {
    const BLOCK_TAGS: &[&str] = &[
        "div", "p", "li", "ul", "ol", "dl", "dt", "dd", "section", "table", "br", "hr", "h1",
        "h2", "h3", "h4", "h5", "h6",
    ];

    let mut parts: Vec<String> = Vec::new();
    let mut sibling = sel.nodes().first().and_then(dom_query::NodeRef::prev_sibling);
    while let Some(node) = sibling {
        if node.is_element() {
            let is_block = node
                .node_name()
                .is_some_and(|name| BLOCK_TAGS.contains(&&*name));
            if is_block {
                break;
            }
        }
        let text = node.text();
        if !text.trim().is_empty() {
            parts.push(text.to_string());
        }
        sibling = node.prev_sibling();
    }
    parts.reverse();
    parts.join(" ")
}

// === Cloning ===

/// Clone an element with all descendants into a fresh document.
///
/// Edits on the returned document never touch the original page.
#[must_use]
pub fn clone_element(sel: &Selection) -> Document {
    Document::from(outer_html(sel))
}

/// Remove the selected elements and everything below them.
#[inline]
pub fn remove(sel: &Selection) {
    sel.remove();
}

/// Remove elements but keep their children (unwrap)
#[inline]
pub fn strip_tags(sel: &Selection, tags: &[&str]) {
    sel.strip_elements(tags);
}

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}
