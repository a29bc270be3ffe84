//! # rs-contactscrape
//!
//! Heuristic contact-field extraction from semi-structured profile pages.
//!
//! Profile pages on the target site show a name, an external website, a
//! location and a phone number, but the markup around each field changes from
//! page to page and is interleaved with login modals and framework bootstrap
//! data. Each field is recovered by an ordered chain of strategies (label
//! location, container narrowing, content mining) and every value passes a
//! noise filter before it is accepted. A field that cannot be found is
//! absent, never a guess that looks wrong.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_contactscrape::extract_record;
//!
//! let html = r#"<html><body>
//!   <h1>Example Film Festival</h1>
//!   <a title="Visit website" href="https://example.org/?utm=1">Visit website</a>
//!   <dl><dt>Phone</dt><dd><a href="tel:+14165551234">416-555-1234</a></dd></dl>
//! </body></html>"#;
//!
//! let record = extract_record(html, "https://filmfreeway.com/ExampleFest");
//! assert_eq!(record.website.as_deref(), Some("https://example.org/?utm=1"));
//! assert_eq!(record.phone.as_deref(), Some("416-555-1234"));
//! ```
//!
//! ## Fetching and storing
//!
//! [`fetch::ProxyFetcher`] retrieves pages through a rendering proxy with a
//! static-then-rendered fallback; [`storage::SqliteStore`] keeps one row per
//! page; [`orchestrator::Orchestrator`] ties them together for a seed list.

mod error;
mod options;
mod result;

/// Compiled regex patterns shared by the extractors.
pub mod patterns;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Label location and container narrowing.
pub mod selector;

/// Noise filter applied to every extracted value.
pub mod noise;

/// URL mining from attributes and inline scripts.
pub mod mining;

/// Field extractors and the strategy chain they share.
pub mod extractor;

/// Structured metadata (JSON-LD) links.
pub mod metadata;

/// URL validation, host matching and admissibility.
pub mod url_utils;

/// Character decoding of fetched bodies.
pub mod encoding;

/// Proxy fetching with static/rendered fallback and bounded retry.
pub mod fetch;

/// Record persistence.
pub mod storage;

/// Seed-list processing.
pub mod orchestrator;

// Public API - re-exports
pub use error::{Error, FetchError, Result};
pub use options::Options;
pub use result::{Candidate, Record};

/// Extract a record from an HTML string using default options.
///
/// No network access: the rendered-page strategies are skipped.
#[must_use]
pub fn extract_record(html: &str, source_url: &str) -> Record {
    extract_record_with_options(html, source_url, &Options::default())
}

/// Extract a record from an HTML string with custom options.
///
/// # Example
///
/// ```rust
/// use rs_contactscrape::{extract_record_with_options, Options};
///
/// let options = Options {
///     identifier_attribute: "data-profile-id".to_string(),
///     ..Options::default()
/// };
/// let html = r#"<div data-profile-id="42"><h1>Profile</h1></div>"#;
/// let record = extract_record_with_options(html, "https://example.com/p", &options);
/// assert_eq!(record.identifier.as_deref(), Some("42"));
/// ```
#[must_use]
pub fn extract_record_with_options(html: &str, source_url: &str, options: &Options) -> Record {
    let page = extractor::Page::parse(source_url, html);
    let ctx = extractor::PageContext::static_only(&page);
    extractor::extract_record(&ctx, options)
}

/// Extract a record from raw HTML bytes, detecting the charset from `<meta>`.
///
/// # Example
///
/// ```rust
/// use rs_contactscrape::extract_record_bytes;
///
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body><h1>Caf\xE9 Fest</h1></body></html>";
/// let record = extract_record_bytes(html, "https://filmfreeway.com/Cafe");
/// assert_eq!(record.name.as_deref(), Some("Café Fest"));
/// ```
#[must_use]
pub fn extract_record_bytes(html: &[u8], source_url: &str) -> Record {
    let html = encoding::decode_body(html, None);
    extract_record(&html, source_url)
}
