//! Label location.
//!
//! Profile pages render each field as a visible label ("Website", "Phone",
//! "Location") next to its value, but the markup around the label changes from
//! page to page: sometimes a `<dt>`, sometimes bold text, sometimes a bare
//! `<div>`. The matchers below are tried strongest first.

use dom_query::{NodeRef, Selection};
use tracing::trace;

use super::utils::{self, fold, folded_text};

/// Children that can hold a label: not script-like, not a noise widget.
fn is_visible_child(child: &Selection) -> bool {
    !utils::is_one_of_tags(child, utils::INVISIBLE_TAGS) && !utils::is_noise_container(child)
}

fn push_visible_text(node: &NodeRef, out: &mut String) {
    let mut child = node.first_child();
    while let Some(current) = child {
        if current.is_text() {
            out.push_str(&current.text());
        } else if current.is_element() && is_visible_child(&Selection::from(current)) {
            push_visible_text(&current, out);
        }
        child = current.next_sibling();
    }
}

/// Folded text of `sel` without scripts, styles or noise widgets below it.
fn visible_text(sel: &Selection) -> String {
    let mut out = String::new();
    for node in sel.nodes() {
        push_visible_text(node, &mut out);
    }
    fold(&out)
}

/// Structural matcher for a label node, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMatcher {
    /// `<dt>` whose whole text is the label.
    DefinitionTerm,
    /// `<strong>`/`<b>` whose whole text is the label.
    Emphasis,
    /// Block or inline container whose whole text is the label.
    WholeText,
    /// Innermost element whose visible text contains the label.
    ContainsText,
}

impl LabelMatcher {
    /// Matchers from strongest to weakest.
    pub const PRIORITY: [Self; 4] = [
        Self::DefinitionTerm,
        Self::Emphasis,
        Self::WholeText,
        Self::ContainsText,
    ];

    fn candidate_tags(self) -> &'static str {
        match self {
            Self::DefinitionTerm => "dt",
            Self::Emphasis => "strong, b",
            Self::WholeText => "div, span, p, li",
            Self::ContainsText => "*",
        }
    }

    /// Does `sel` match `label`? `label` must already be folded.
    #[must_use]
    pub fn matches(self, sel: &Selection, label: &str) -> bool {
        match self {
            Self::DefinitionTerm | Self::Emphasis | Self::WholeText => folded_text(sel) == label,
            Self::ContainsText => {
                visible_text(sel).contains(label)
                    && !sel.children().nodes().iter().any(|child| {
                        let child = Selection::from(*child);
                        is_visible_child(&child) && visible_text(&child).contains(label)
                    })
            }
        }
    }

    /// First visible element under `root` this matcher accepts, in document order.
    #[must_use]
    pub fn find<'a>(self, root: &Selection<'a>, label: &str) -> Option<Selection<'a>> {
        for node in root.select(self.candidate_tags()).nodes() {
            let sel = Selection::from(*node);
            if self.matches(&sel, label) && !utils::is_hidden_or_noise(&sel) {
                return Some(sel);
            }
        }
        None
    }
}

/// Locate the node for the first of `labels` present under `root`.
///
/// Labels are synonyms in order of preference; for each, the matchers run
/// strongest first. Labels inside `<head>`, scripts, or noise containers
/// (modals, login widgets) are never returned.
///
/// # Example
///
/// ```rust
/// use rs_contactscrape::{dom, selector};
///
/// let doc = dom::parse("<dl><dt>PHONE</dt><dd>416-555-1234</dd></dl>");
/// let root = doc.select("html");
/// let node = selector::locate(&root, &["Phone"]);
/// assert_eq!(node.map(|n| dom::tag_name(&n)), Some(Some("dt".to_string())));
/// ```
#[must_use]
pub fn locate<'a>(root: &Selection<'a>, labels: &[&str]) -> Option<Selection<'a>> {
    for label in labels {
        let label = fold(label);
        if label.is_empty() {
            continue;
        }
        for matcher in LabelMatcher::PRIORITY {
            if let Some(hit) = matcher.find(root, &label) {
                trace!(label = %label, ?matcher, "label located");
                return Some(hit);
            }
        }
    }
    None
}
