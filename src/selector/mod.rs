//! Selector Infrastructure
//!
//! Predicate rules over the parsed tree, plus the two structural searches the
//! field extractors are built on: finding a label and narrowing from it to the
//! block that holds the value.

use dom_query::Selection;

pub mod container;
pub mod label;
pub mod utils;

pub use container::narrow;
pub use label::{locate, LabelMatcher};

/// A selector rule that tests if a selection matches certain criteria
pub type Rule = fn(&Selection) -> bool;

/// Query for first element matching the rule
///
/// Iterates through all descendants in document order and returns the first
/// element for which the rule returns true.
///
/// # Example
///
/// ```rust
/// use rs_contactscrape::selector::{self, utils};
/// use rs_contactscrape::dom;
///
/// let doc = dom::parse(r#"<div><i class="fa fa-globe"></i><a href="https://example.org">site</a></div>"#);
/// let root = doc.select("div");
///
/// fn is_globe_icon(sel: &dom_query::Selection) -> bool {
///     utils::class(sel).contains("globe")
/// }
///
/// let result = selector::query(&root, is_globe_icon);
/// assert!(result.is_some());
/// ```
#[must_use]
pub fn query<'a>(root: &Selection<'a>, rule: Rule) -> Option<Selection<'a>> {
    for node in root.select("*").nodes() {
        let sel = Selection::from(*node);
        if rule(&sel) {
            return Some(sel);
        }
    }
    None
}
