//! URL Utility Functions
//!
//! URL validation, host matching and the admissibility test that decides
//! whether a URL can be a profile's own external website.

use url::Url;

use crate::Options;

/// Check if a string is a valid absolute URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if s.is_empty() {
        return (false, None);
    }

    // Must start with http:// or https://
    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) => {
            if url.host().is_some() {
                (true, Some(url))
            } else {
                (false, None)
            }
        }
        Err(_) => (false, None),
    }
}

/// Extract the lowercase hostname from an absolute URL.
#[must_use]
pub fn extract_hostname(url_str: &str) -> Option<String> {
    let (is_abs, parsed) = is_absolute_url(url_str);
    if !is_abs {
        return None;
    }
    parsed
        .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
        .filter(|h| !h.is_empty())
}

/// Does `url` fall under `pattern`?
///
/// A pattern is a bare host (`facebook.com`, matching it and any subdomain)
/// or a host plus path prefix (`google.com/maps`).
#[must_use]
pub fn host_matches(url: &Url, pattern: &str) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    let pattern = pattern.trim().to_ascii_lowercase();
    let (pat_host, pat_path) = match pattern.split_once('/') {
        Some((h, p)) => (h, Some(p)),
        None => (pattern.as_str(), None),
    };
    if pat_host.is_empty() {
        return false;
    }
    let host_ok = host == pat_host || host.ends_with(&format!(".{pat_host}"));
    match pat_path {
        Some(path) => host_ok && url.path().trim_start_matches('/').starts_with(path),
        None => host_ok,
    }
}

/// Is `url` the origin site, a social network or a map host?
#[must_use]
pub fn is_blocked_host(url: &Url, options: &Options) -> bool {
    host_matches(url, &options.origin_host)
        || options.social_hosts.iter().any(|h| host_matches(url, h))
        || options.map_hosts.iter().any(|h| host_matches(url, h))
}

/// Can `candidate` be accepted as a genuine external website?
///
/// It must be an absolute http(s) URL whose host is neither the origin site
/// nor a known social or map host.
///
/// # Example
///
/// ```rust
/// use rs_contactscrape::{url_utils, Options};
///
/// let options = Options::default();
/// assert!(url_utils::is_admissible_url("https://example.org/?utm=1", &options));
/// assert!(!url_utils::is_admissible_url("https://filmfreeway.com/Other", &options));
/// assert!(!url_utils::is_admissible_url("https://www.facebook.com/fest", &options));
/// ```
#[must_use]
pub fn is_admissible_url(candidate: &str, options: &Options) -> bool {
    let (is_abs, parsed) = is_absolute_url(candidate);
    if !is_abs {
        return false;
    }
    parsed.is_some_and(|url| !is_blocked_host(&url, options))
}

/// Is `url` a link to a map provider?
#[must_use]
pub fn is_map_url(url_str: &str, options: &Options) -> bool {
    let (_, parsed) = is_absolute_url(url_str);
    parsed.is_some_and(|url| options.map_hosts.iter().any(|h| host_matches(&url, h)))
}

/// Is `href` a client-side placeholder standing in for the real target?
#[must_use]
pub fn is_js_placeholder(href: &str) -> bool {
    let href = href.trim();
    href.is_empty()
        || href == "#"
        || href.to_ascii_lowercase().starts_with("javascript:")
}

/// Trim the punctuation a URL picks up when scraped out of running text or
/// script source, and undo JSON-escaped slashes.
#[must_use]
pub fn clean_url_candidate(raw: &str) -> String {
    let mut s = raw.trim().replace("\\/", "/").replace("&amp;", "&");

    while s.ends_with(['"', '\'', ')', ']', '}', '>', ',', '.', ';', ':']) {
        s.pop();
    }
    while s.starts_with(['"', '\'']) {
        s.remove(0);
    }

    s
}
