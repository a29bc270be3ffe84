//! Result types for extraction output.
//!
//! `Record` is what gets stored; `Candidate` is the tentative value a single
//! strategy produces before the acceptance checks run.

use dom_query::NodeId;
use serde::{Deserialize, Serialize};

/// One stored row per source page.
///
/// Every optional field is either `None` or a non-empty string that passed
/// the noise filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Page the record was scraped from. Unique key in the store.
    pub source_url: String,

    /// Numeric identifier the site assigns to the profile.
    pub identifier: Option<String>,

    /// Profile name (first `h1`, else `<title>`).
    pub name: Option<String>,

    /// External website of the profile owner.
    pub website: Option<String>,

    /// Postal address or city line.
    pub location: Option<String>,

    /// Contact phone number as displayed.
    pub phone: Option<String>,
}

impl Record {
    /// An empty record for `source_url`.
    #[must_use]
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            ..Self::default()
        }
    }

    /// Number of optional fields that carry a value.
    #[must_use]
    pub fn filled_fields(&self) -> usize {
        [
            &self.identifier,
            &self.name,
            &self.website,
            &self.location,
            &self.phone,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count()
    }
}

/// A tentative field value and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The value as extracted, before acceptance checks.
    pub text: String,

    /// Node the value was read from, when there is a single one.
    pub origin: Option<NodeId>,

    /// Name of the strategy that produced it.
    pub strategy: &'static str,
}

impl Candidate {
    #[must_use]
    pub fn new(text: impl Into<String>, origin: Option<NodeId>, strategy: &'static str) -> Self {
        Self {
            text: text.into(),
            origin,
            strategy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_has_only_the_key() {
        let record = Record::new("https://filmfreeway.com/Example");
        assert_eq!(record.source_url, "https://filmfreeway.com/Example");
        assert_eq!(record.filled_fields(), 0);
    }

    #[test]
    fn record_serializes_absent_fields_as_null() {
        let record = Record {
            phone: Some("416-555-1234".to_string()),
            ..Record::new("https://filmfreeway.com/Example")
        };
        let json = serde_json::to_string(&record).unwrap_or_default();
        assert!(json.contains(r#""phone":"416-555-1234""#));
        assert!(json.contains(r#""website":null"#));
        assert_eq!(record.filled_fields(), 1);
    }
}
