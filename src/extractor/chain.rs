//! Strategy chain shared by all field extractors.

use tracing::{debug, trace};

use super::{Page, PageContext};
use crate::{Candidate, Options};

/// Which copy of the page a strategy reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The page as fetched without JavaScript rendering.
    Static,
    /// The rendered copy, fetched lazily when first needed.
    Rendered,
}

/// One heuristic for one field.
pub trait ExtractionStrategy {
    /// Stable name, used in logs and on the produced candidate.
    fn name(&self) -> &'static str;

    /// Try to produce a candidate. `None` means "nothing here, try the next one".
    fn attempt(&self, ctx: &PageContext<'_>, options: &Options) -> Option<Candidate>;
}

/// A strategy backed by a plain function over one copy of the page.
#[derive(Clone, Copy)]
pub struct Strategy {
    pub name: &'static str,
    pub target: Target,
    pub run: fn(&Page, &Options) -> Option<Candidate>,
}

impl Strategy {
    #[must_use]
    pub const fn on_static(name: &'static str, run: fn(&Page, &Options) -> Option<Candidate>) -> Self {
        Self {
            name,
            target: Target::Static,
            run,
        }
    }

    #[must_use]
    pub const fn on_rendered(name: &'static str, run: fn(&Page, &Options) -> Option<Candidate>) -> Self {
        Self {
            name,
            target: Target::Rendered,
            run,
        }
    }
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Strategy")
            .field("name", &self.name)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl ExtractionStrategy for Strategy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn attempt(&self, ctx: &PageContext<'_>, options: &Options) -> Option<Candidate> {
        let page = match self.target {
            Target::Static => ctx.page(),
            Target::Rendered => ctx.rendered()?,
        };
        (self.run)(page, options)
    }
}

/// Final check a candidate must pass; returns the value to keep.
pub type Acceptor = fn(&str, &Options) -> Option<String>;

/// Ordered strategies for one field.
pub struct Chain<'a> {
    field: &'static str,
    strategies: Vec<&'a dyn ExtractionStrategy>,
}

impl<'a> Chain<'a> {
    #[must_use]
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            strategies: Vec::new(),
        }
    }

    /// Chain over a fixed table of strategies, in table order.
    #[must_use]
    pub fn from_strategies<S: ExtractionStrategy + 'a>(field: &'static str, strategies: &'a [S]) -> Self {
        Self {
            field,
            strategies: strategies.iter().map(|s| s as &dyn ExtractionStrategy).collect(),
        }
    }

    /// Append a strategy at the end of the chain.
    #[must_use]
    pub fn then(mut self, strategy: &'a dyn ExtractionStrategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Names of the strategies, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// First candidate that `accept` keeps.
    ///
    /// Strategies after the winning one never run, so a rendered-page
    /// strategy placed late in the chain only triggers a render when
    /// everything before it came up empty.
    pub fn first(&self, ctx: &PageContext<'_>, options: &Options, accept: Acceptor) -> Option<Candidate> {
        for strategy in &self.strategies {
            let Some(candidate) = strategy.attempt(ctx, options) else {
                trace!(field = self.field, strategy = strategy.name(), "no candidate");
                continue;
            };
            match accept(&candidate.text, options) {
                Some(text) => {
                    debug!(field = self.field, strategy = strategy.name(), "candidate accepted");
                    return Some(Candidate { text, ..candidate });
                }
                None => {
                    debug!(field = self.field, strategy = strategy.name(), "candidate rejected");
                }
            }
        }
        None
    }

    /// Every candidate every strategy produces, in chain order.
    pub fn collect(&self, ctx: &PageContext<'_>, options: &Options) -> Vec<Candidate> {
        let candidates: Vec<Candidate> = self
            .strategies
            .iter()
            .filter_map(|s| s.attempt(ctx, options))
            .collect();
        trace!(field = self.field, count = candidates.len(), "candidates collected");
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn heading(page: &Page, _: &Options) -> Option<Candidate> {
        let text = crate::dom::text_content(&page.document().select("h1")).to_string();
        (!text.is_empty()).then(|| Candidate::new(text, None, "heading"))
    }

    fn junk(_: &Page, _: &Options) -> Option<Candidate> {
        Some(Candidate::new("setup.require('x')", None, "junk"))
    }

    fn keep_clean(text: &str, options: &Options) -> Option<String> {
        crate::noise::accept(Some(text.to_string()), options.max_field_len, options)
    }

    const TABLE: &[Strategy] = &[
        Strategy::on_static("junk", junk),
        Strategy::on_static("heading", heading),
        Strategy::on_rendered("rendered_heading", heading),
    ];

    #[test]
    fn test_first_skips_rejected_candidates() {
        let page = Page::parse("https://filmfreeway.com/A", "<h1>Static</h1>");
        let ctx = PageContext::static_only(&page);
        let chain = Chain::from_strategies("name", TABLE);

        let found = chain.first(&ctx, &Options::default(), keep_clean);
        assert_eq!(found.map(|c| c.text), Some("Static".to_string()));
    }

    #[test]
    fn test_rendered_strategy_only_runs_when_reached() {
        let calls = Cell::new(0);
        let renderer = |_: &str| {
            calls.set(calls.get() + 1);
            Some("<h1>Rendered</h1>".to_string())
        };

        let page = Page::parse("https://filmfreeway.com/A", "<h1>Static</h1>");
        let ctx = PageContext::new(&page, &renderer);
        let chain = Chain::from_strategies("name", TABLE);
        assert!(chain.first(&ctx, &Options::default(), keep_clean).is_some());
        assert_eq!(calls.get(), 0);

        let bare = Page::parse("https://filmfreeway.com/A", "<p>nothing</p>");
        let ctx = PageContext::new(&bare, &renderer);
        let found = chain.first(&ctx, &Options::default(), keep_clean);
        assert_eq!(found.map(|c| c.text), Some("Rendered".to_string()));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_collect_returns_all_candidates() {
        let page = Page::parse("https://filmfreeway.com/A", "<h1>Static</h1>");
        let ctx = PageContext::static_only(&page);
        let chain = Chain::from_strategies("name", TABLE);

        let all = chain.collect(&ctx, &Options::default());
        let names: Vec<&str> = all.iter().map(|c| c.strategy).collect();
        assert_eq!(names, vec!["junk", "heading"]);
    }

    #[test]
    fn test_then_appends() {
        let extra = Strategy::on_static("extra", heading);
        let chain = Chain::new("name").then(&extra);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.names(), vec!["extra"]);
        assert!(!chain.is_empty());
    }
}
