//! Configuration options for field extraction.
//!
//! The `Options` struct carries the tuning data the extractors depend on:
//! which hosts count as "not a real website", which words look like an
//! address, which strings are junk. These lists were tuned repeatedly against
//! the target site and are data, not contract.

/// Configuration options for field extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for the settings tuned against the target site.
///
/// # Example
///
/// ```rust
/// use rs_contactscrape::Options;
///
/// let options = Options {
///     origin_host: "example.com".to_string(),
///     ..Options::default()
/// };
/// assert_eq!(options.container_html_limit, 4000);
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Host of the site being scraped. Links back to it are never a website.
    ///
    /// Subdomains match too (`www.filmfreeway.com`).
    ///
    /// Default: `"filmfreeway.com"`
    pub origin_host: String,

    /// Social network hosts rejected as a website value.
    pub social_hosts: Vec<String>,

    /// Map hosting hosts rejected as a website value, and used to spot
    /// "view map" links next to an address.
    pub map_hosts: Vec<String>,

    /// City/country keywords that make a candidate look like an address.
    pub address_keywords: Vec<String>,

    /// UI label words stripped from location text.
    pub label_words: Vec<String>,

    /// Substrings that mark a value as scraped structural junk.
    pub noise_markers: Vec<String>,

    /// Maximum length of a text field before it is treated as noise.
    ///
    /// Default: `500`
    pub max_field_len: usize,

    /// Maximum length of a website URL before it is treated as noise.
    ///
    /// Default: `2048`
    pub max_url_len: usize,

    /// Containers with more inner markup than this are too broad to narrow to.
    ///
    /// Default: `4000`
    pub container_html_limit: usize,

    /// Shortest location accepted without an address shape.
    ///
    /// Default: `10`
    pub min_location_len: usize,

    /// Longest location accepted without an address shape.
    ///
    /// Default: `200`
    pub max_location_len: usize,

    /// Anything longer than this is not an address, whatever it looks like.
    ///
    /// Default: `220`
    pub location_hard_limit: usize,

    /// Data attribute carrying the numeric identifier.
    ///
    /// Default: `"data-festival-id"`
    pub identifier_attribute: String,

    /// Script keys (JSON-style or assignment-style) holding the identifier.
    ///
    /// Default: `["festival_id", "festivalId"]`
    pub identifier_script_keys: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for Options {
    fn default() -> Self {
        Self {
            origin_host: "filmfreeway.com".to_string(),
            social_hosts: strings(&[
                "facebook.com",
                "fb.com",
                "instagram.com",
                "twitter.com",
                "x.com",
                "youtube.com",
                "youtu.be",
                "linkedin.com",
                "tiktok.com",
                "vimeo.com",
                "pinterest.com",
            ]),
            map_hosts: strings(&[
                "maps.google.com",
                "google.com/maps",
                "goo.gl",
                "maps.app.goo.gl",
                "maps.apple.com",
                "bing.com/maps",
                "openstreetmap.org",
                "mapquest.com",
            ]),
            address_keywords: strings(&["canada", "usa", "uk", "city", "toronto"]),
            label_words: strings(&[
                "Website",
                "Facebook",
                "Instagram",
                "Twitter",
                "X",
                "Email",
                "View Map",
                "Contact",
                "Location",
                "Address",
                "Phone",
            ]),
            noise_markers: strings(&[
                "{\"user_signed_in\"",
                "fonts_to_prefetch",
                "ModalLogin",
                "StrongPassword",
                "setup.require(",
            ]),
            max_field_len: 500,
            max_url_len: 2048,
            container_html_limit: 4000,
            min_location_len: 10,
            max_location_len: 200,
            location_hard_limit: 220,
            identifier_attribute: "data-festival-id".to_string(),
            identifier_script_keys: strings(&["festival_id", "festivalId"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_the_tuned_lists() {
        let options = Options::default();
        assert_eq!(options.origin_host, "filmfreeway.com");
        assert!(options.social_hosts.iter().any(|h| h == "facebook.com"));
        assert!(options.map_hosts.iter().any(|h| h == "maps.google.com"));
        assert!(options.noise_markers.iter().any(|m| m == "ModalLogin"));
        assert_eq!(options.max_field_len, 500);
    }

    #[test]
    fn struct_update_overrides_selected_fields_only() {
        let options = Options {
            origin_host: "example.org".to_string(),
            ..Options::default()
        };
        assert_eq!(options.origin_host, "example.org");
        assert_eq!(options.location_hard_limit, 220);
    }
}
