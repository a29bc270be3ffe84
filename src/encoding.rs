//! Character decoding of fetched bodies.
//!
//! The proxy hands back raw bytes. The charset is taken from a byte-order
//! mark, then the `Content-Type` response header, then a `<meta>` declaration
//! in the first kilobyte, and defaults to UTF-8. Invalid sequences become
//! U+FFFD rather than failing the page.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// `<meta charset="...">`
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;]+)"#).expect("valid regex")
});

/// `charset=` parameter of a `Content-Type` value.
#[allow(clippy::expect_used)]
static CHARSET_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i);\s*charset\s*=\s*["']?([^"'\s;]+)"#).expect("valid regex")
});

/// How far into the body `<meta>` declarations are looked for.
const SNIFF_LIMIT: usize = 1024;

fn charset_from_header(content_type: &str) -> Option<&'static Encoding> {
    let label = CHARSET_PARAM_RE.captures(content_type)?.get(1)?;
    Encoding::for_label(label.as_str().as_bytes())
}

fn charset_from_meta(body: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&body[..body.len().min(SNIFF_LIMIT)]);
    let label = CHARSET_META_RE.captures(&head)?.get(1)?;
    Encoding::for_label(label.as_str().as_bytes())
}

/// Detect the encoding of a response body.
#[must_use]
pub fn detect_encoding(body: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(body) {
        return encoding;
    }
    content_type
        .and_then(charset_from_header)
        .or_else(|| charset_from_meta(body))
        .unwrap_or(UTF_8)
}

/// Decode a response body to a UTF-8 string, lossily.
///
/// # Examples
///
/// ```
/// use rs_contactscrape::encoding::decode_body;
///
/// let body = b"<html><body>Caf\xE9</body></html>";
/// assert!(decode_body(body, Some("text/html; charset=ISO-8859-1")).contains("Café"));
/// ```
#[must_use]
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect_encoding(body, content_type);
    let (decoded, _used, _had_errors) = encoding.decode(body);
    decoded.into_owned()
}
