//! Field extraction.
//!
//! Every field is a [`Chain`] of named strategies run against a
//! [`PageContext`]. The context owns nothing but the parsed static page and a
//! handle that can produce a JavaScript-rendered copy on demand; the rendered
//! copy is fetched at most once, and only if a strategy that targets it is
//! actually reached.
//!
//! # Module Structure
//!
//! - `chain`: the `ExtractionStrategy` trait and the shared chain runner
//! - `website`: external website link
//! - `location`: postal address or city line
//! - `phone`: contact phone number
//! - `identifier`: numeric profile identifier
//! - `name`: profile name
//!
//! # Usage
//!
//! ```rust
//! use rs_contactscrape::extractor::{self, Page, PageContext};
//! use rs_contactscrape::Options;
//!
//! let page = Page::parse(
//!     "https://filmfreeway.com/Example",
//!     r#"<h1>Example Fest</h1><a title="Visit website" href="https://example.org/">Visit</a>"#,
//! );
//! let ctx = PageContext::static_only(&page);
//! let record = extractor::extract_record(&ctx, &Options::default());
//!
//! assert_eq!(record.name.as_deref(), Some("Example Fest"));
//! assert_eq!(record.website.as_deref(), Some("https://example.org/"));
//! ```

use std::cell::OnceCell;

use dom_query::{Document, Selection};
use tracing::debug;

use crate::{dom, Options, Record};

pub mod chain;
pub mod identifier;
pub mod location;
pub mod name;
pub mod phone;
pub mod website;

pub use chain::{Chain, ExtractionStrategy, Strategy, Target};

/// A fetched page parsed once into a traversable tree.
pub struct Page {
    url: String,
    html: String,
    document: Document,
}

impl Page {
    /// Parse `html` fetched from `url`.
    #[must_use]
    pub fn parse(url: impl Into<String>, html: impl Into<String>) -> Self {
        let html = html.into();
        let document = dom::parse(&html);
        Self {
            url: url.into(),
            html,
            document,
        }
    }

    /// Source URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw markup as fetched.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The `<html>` element.
    #[must_use]
    pub fn root(&self) -> Selection<'_> {
        self.document.select("html")
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("url", &self.url)
            .field("html_len", &self.html.len())
            .finish_non_exhaustive()
    }
}

/// Something that can produce the JavaScript-rendered markup of a URL.
pub trait RenderSource {
    /// Rendered HTML for `url`, or `None` if it cannot be had.
    fn render(&self, url: &str) -> Option<String>;
}

/// A render source that never renders. Used for offline extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRender;

impl RenderSource for NoRender {
    fn render(&self, _url: &str) -> Option<String> {
        None
    }
}

impl<F> RenderSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn render(&self, url: &str) -> Option<String> {
        self(url)
    }
}

static NO_RENDER: NoRender = NoRender;

/// The static page plus lazy access to its rendered counterpart.
pub struct PageContext<'p> {
    page: &'p Page,
    renderer: &'p dyn RenderSource,
    rendered: OnceCell<Option<Page>>,
    page_is_rendered: bool,
}

impl<'p> PageContext<'p> {
    #[must_use]
    pub fn new(page: &'p Page, renderer: &'p dyn RenderSource) -> Self {
        Self {
            page,
            renderer,
            rendered: OnceCell::new(),
            page_is_rendered: false,
        }
    }

    /// Context for a page that was fetched already rendered; it serves as
    /// its own rendered copy.
    #[must_use]
    pub fn from_rendered(page: &'p Page) -> Self {
        Self {
            page_is_rendered: true,
            ..Self::new(page, &NO_RENDER)
        }
    }

    /// Context with no rendered copy available.
    #[must_use]
    pub fn static_only(page: &'p Page) -> Self {
        Self::new(page, &NO_RENDER)
    }

    /// The page as fetched without rendering.
    #[must_use]
    pub fn page(&self) -> &'p Page {
        self.page
    }

    /// The rendered page, fetched on first call.
    ///
    /// A failed render is remembered too, so the renderer is asked at most
    /// once per context.
    pub fn rendered(&self) -> Option<&Page> {
        if self.page_is_rendered {
            return Some(self.page);
        }
        self.rendered
            .get_or_init(|| {
                debug!(url = %self.page.url, "requesting rendered copy");
                self.renderer
                    .render(&self.page.url)
                    .map(|html| Page::parse(self.page.url.clone(), html))
            })
            .as_ref()
    }

    /// Whether the rendered copy has been asked for yet.
    #[must_use]
    pub fn render_requested(&self) -> bool {
        self.rendered.get().is_some()
    }
}

/// Run every field extractor and assemble the record for the page.
#[must_use]
pub fn extract_record(ctx: &PageContext<'_>, options: &Options) -> Record {
    let record = Record {
        source_url: ctx.page().url().to_string(),
        identifier: identifier::extract(ctx, options),
        name: name::extract(ctx, options),
        website: website::extract(ctx, options),
        location: location::extract(ctx, options),
        phone: phone::extract(ctx, options),
    };
    debug!(
        url = %record.source_url,
        filled = record.filled_fields(),
        rendered = ctx.render_requested(),
        "record assembled"
    );
    record
}
