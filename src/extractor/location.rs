//! Location extraction.
//!
//! Candidates come from the "Location" row, from the text just before a map
//! link, and from the contact block. All of them are reduced to visible text
//! with phone numbers stripped, then one is picked by shape.

use dom_query::Selection;
use regex::Regex;

use super::{Chain, Page, PageContext, Strategy};
use crate::patterns::{collapse_whitespace, compiled, PHONE, POSTAL_CODE, STREET_TOKEN};
use crate::selector::utils::{attr, is_noise_container};
use crate::selector::{locate, narrow};
use crate::url_utils::is_map_url;
use crate::{dom, noise, Candidate, Options};

/// Case-insensitive whole-word alternation over `words`.
fn word_regex(words: &[String]) -> Option<Regex> {
    let mut words: Vec<&str> = words.iter().map(|w| w.trim()).filter(|w| !w.is_empty()).collect();
    if words.is_empty() {
        return None;
    }
    // Longest first so "View Map" wins over any shorter overlapping word.
    words.sort_by_key(|w| std::cmp::Reverse(w.len()));
    let alternation = words.iter().map(|w| regex::escape(w)).collect::<Vec<_>>().join("|");
    compiled(&format!(r"(?i)\b(?:{alternation})\b"))
}

/// Remove UI label words, collapse whitespace and drop the separator
/// punctuation a removed label leaves behind (`Location: ...`).
fn strip_label_words(text: &str, options: &Options) -> String {
    let text = match word_regex(&options.label_words) {
        Some(re) => re.replace_all(text, " ").into_owned(),
        None => text.to_string(),
    };
    collapse_whitespace(&text)
        .trim_matches(|c: char| matches!(c, ':' | '-' | ',') || c.is_whitespace())
        .to_string()
}

/// Visible text of `container` with scripts, nested noise widgets and label
/// words removed. Anchors contribute their text, never their href.
#[must_use]
pub fn text_only(container: &Selection, options: &Options) -> Option<String> {
    let fragment = dom::clone_element(container);
    dom::remove(&fragment.select("script, style, noscript, template"));

    let noisy: Vec<Selection> = fragment
        .select("[class]")
        .nodes()
        .iter()
        .map(|n| Selection::from(*n))
        .filter(is_noise_container)
        .collect();
    for sel in &noisy {
        dom::remove(sel);
    }

    let body = fragment.select("body");
    dom::strip_tags(&body, &["a"]);

    let joined = dom::text_fragments(&body).join(" ");
    let text = strip_label_words(&joined, options);
    (!text.is_empty()).then_some(text)
}

/// Remove every phone-shaped run, repeating until none is left.
#[must_use]
pub fn strip_phones(text: &str) -> String {
    let mut out = text.to_string();
    while PHONE.is_match(&out) {
        out = PHONE.replace_all(&out, " ").into_owned();
    }
    collapse_whitespace(&out)
        .trim_matches(|c: char| c == ',' || c == ';' || c == '|' || c.is_whitespace())
        .to_string()
}

fn looks_like_address(text: &str, options: &Options) -> bool {
    if !text.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    STREET_TOKEN.is_match(text)
        || POSTAL_CODE.is_match(text)
        || word_regex(&options.address_keywords).is_some_and(|re| re.is_match(text))
}

/// Choose the location among cleaned candidates.
///
/// Address-shaped text wins; otherwise the first candidate of plausible
/// length. Nothing longer than the hard limit is ever returned.
#[must_use]
pub fn pick(candidates: &[String], options: &Options) -> Option<String> {
    let within = |t: &&String| {
        let len = t.chars().count();
        len >= options.min_location_len && len <= options.max_location_len
    };
    let chosen = candidates
        .iter()
        .find(|t| looks_like_address(t, options))
        .or_else(|| candidates.iter().find(within))?;
    (chosen.chars().count() <= options.location_hard_limit).then(|| chosen.clone())
}

fn labeled_text(page: &Page, options: &Options, labels: &[&str], strategy: &'static str) -> Option<Candidate> {
    let label = locate(&page.root(), labels)?;
    let container = narrow(&label, options);
    text_only(&container, options).map(|t| Candidate::new(t, dom::node_id(&container), strategy))
}

fn location_row(page: &Page, options: &Options) -> Option<Candidate> {
    labeled_text(page, options, &["Location"], "location.row")
}

fn map_link(page: &Page, options: &Options) -> Option<Candidate> {
    let label = locate(&page.root(), &["Location"])?;
    let container = narrow(&label, options);
    container.select("a").nodes().iter().find_map(|n| {
        let anchor = Selection::from(*n);
        if !is_map_url(&attr(&anchor, "href"), options) {
            return None;
        }
        let text = strip_label_words(&dom::preceding_text(&anchor), options);
        (!text.is_empty()).then(|| Candidate::new(text, dom::node_id(&anchor), "location.map_link"))
    })
}

fn contact_block(page: &Page, options: &Options) -> Option<Candidate> {
    labeled_text(page, options, &["Contact", "Contact Email"], "location.contact")
}

/// Location strategies; all of them contribute candidates.
pub const STRATEGIES: &[Strategy] = &[
    Strategy::on_static("location.row", location_row),
    Strategy::on_static("location.map_link", map_link),
    Strategy::on_static("location.contact", contact_block),
];

#[must_use]
pub fn chain() -> Chain<'static> {
    Chain::from_strategies("location", STRATEGIES)
}

/// The profile's postal address or city line.
#[must_use]
pub fn extract(ctx: &PageContext<'_>, options: &Options) -> Option<String> {
    let cleaned: Vec<String> = chain()
        .collect(ctx, options)
        .iter()
        .map(|c| strip_phones(&c.text))
        .filter(|t| !t.is_empty())
        .collect();
    let picked = pick(&cleaned, options);
    noise::accept(picked, options.max_field_len, options)
}
