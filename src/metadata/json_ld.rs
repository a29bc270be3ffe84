//! JSON-LD Link Extraction
//!
//! Profile pages sometimes embed Schema.org `Organization` or `Event` blocks
//! whose `url` / `sameAs` properties point at the owner's own site. This
//! module walks every `application/ld+json` script and returns those links.

use dom_query::{Document, Selection};
use serde_json::Value;
use tracing::trace;

use crate::url_utils::is_admissible_url;
use crate::{dom, Options};

/// Properties that carry outbound links.
const LINK_KEYS: &[&str] = &["url", "sameAs"];

/// Every `url` / `sameAs` string in the document's JSON-LD, in document order.
///
/// Invalid JSON blocks are skipped. `@graph` arrays and nested objects are
/// walked recursively.
#[must_use]
pub fn collect_links(doc: &Document) -> Vec<String> {
    let mut links = Vec::new();

    for script in doc.select(r#"script[type="application/ld+json"]"#).nodes() {
        let script_sel = Selection::from(*script);
        let json_text = dom::text_content(&script_sel).trim().to_string();

        if json_text.is_empty() {
            continue;
        }

        let data: Value = match serde_json::from_str(&json_text) {
            Ok(v) => v,
            Err(e) => {
                trace!(error = %e, "skipping unparsable JSON-LD block");
                continue;
            }
        };

        collect_from_value(&data, &mut links);
    }

    links
}

/// Recursively gather link values.
fn collect_from_value(value: &Value, links: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for key in LINK_KEYS {
                match map.get(*key) {
                    Some(Value::String(s)) => push_trimmed(s, links),
                    Some(Value::Array(arr)) => {
                        for item in arr {
                            if let Value::String(s) = item {
                                push_trimmed(s, links);
                            }
                        }
                    }
                    _ => {}
                }
            }
            for val in map.values() {
                if val.is_object() || val.is_array() {
                    collect_from_value(val, links);
                }
            }
        }
        Value::Array(arr) => {
            for item in arr {
                collect_from_value(item, links);
            }
        }
        _ => {}
    }
}

fn push_trimmed(s: &str, links: &mut Vec<String>) {
    let s = s.trim();
    if !s.is_empty() {
        links.push(s.to_string());
    }
}

/// First admissible external link declared in JSON-LD.
#[must_use]
pub fn first_admissible_link(doc: &Document, options: &Options) -> Option<String> {
    collect_links(doc)
        .into_iter()
        .find(|link| is_admissible_url(link, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_url_and_same_as() {
        let html = r#"<script type="application/ld+json">
            {"@type": "Organization", "url": "https://filmfreeway.com/Fest",
             "sameAs": ["https://facebook.com/fest", "https://fest.example.org"]}
        </script>"#;
        let doc = dom::parse(html);

        let links = collect_links(&doc);
        assert_eq!(links.len(), 3);
        assert_eq!(
            first_admissible_link(&doc, &Options::default()),
            Some("https://fest.example.org".to_string())
        );
    }

    #[test]
    fn test_walks_graph_arrays() {
        let html = r#"<script type="application/ld+json">
            {"@graph": [{"@type": "WebPage"}, {"@type": "Event", "organizer": {"url": "https://org.example.com"}}]}
        </script>"#;
        let doc = dom::parse(html);

        assert_eq!(collect_links(&doc), vec!["https://org.example.com".to_string()]);
    }

    #[test]
    fn test_invalid_json_is_skipped() {
        let html = r#"<script type="application/ld+json">{ not json</script>
            <script type="application/ld+json">{"url": "https://ok.example.com"}</script>"#;
        let doc = dom::parse(html);

        assert_eq!(
            first_admissible_link(&doc, &Options::default()),
            Some("https://ok.example.com".to_string())
        );
    }

    #[test]
    fn test_no_json_ld() {
        let doc = dom::parse("<html><body><p>none</p></body></html>");
        assert!(collect_links(&doc).is_empty());
        assert!(first_admissible_link(&doc, &Options::default()).is_none());
    }
}
