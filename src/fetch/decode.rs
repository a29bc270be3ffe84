//! Response body decompression.

use std::io::Read;

use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use tracing::debug;

use crate::encoding;

/// `Content-Encoding` values the fetcher asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentEncoding {
    #[default]
    Identity,
    Gzip,
    Deflate,
}

impl ContentEncoding {
    /// Parse a `Content-Encoding` header. Unknown codings are treated as
    /// identity and the body is used as is.
    #[must_use]
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("gzip" | "x-gzip") => Self::Gzip,
            Some("deflate") => Self::Deflate,
            _ => Self::Identity,
        }
    }
}

/// Failure to decompress a body. Never fatal: callers fall back to the raw bytes.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("gzip decode failed: {0}")]
    Gzip(#[source] std::io::Error),

    #[error("deflate decode failed: {0}")]
    Deflate(#[source] std::io::Error),
}

/// Decompress `body` according to `encoding`.
///
/// Deflate is tried zlib-wrapped first (what the header is supposed to
/// mean), then as a raw deflate stream (what some servers actually send).
pub fn decompress(body: &[u8], encoding: ContentEncoding) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::new();
    match encoding {
        ContentEncoding::Identity => Ok(body.to_vec()),
        ContentEncoding::Gzip => {
            GzDecoder::new(body).read_to_end(&mut out).map_err(DecodeError::Gzip)?;
            Ok(out)
        }
        ContentEncoding::Deflate => {
            if ZlibDecoder::new(body).read_to_end(&mut out).is_ok() {
                return Ok(out);
            }
            out.clear();
            DeflateDecoder::new(body)
                .read_to_end(&mut out)
                .map_err(DecodeError::Deflate)?;
            Ok(out)
        }
    }
}

/// A successful proxy response before decoding.
#[derive(Debug, Clone, Default)]
pub struct FetchResult {
    pub body: Vec<u8>,
    pub encoding: ContentEncoding,
    /// `Content-Type` header, used for the charset.
    pub content_type: Option<String>,
}

impl FetchResult {
    /// Decompressed bytes, or the raw body if decompression failed.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match decompress(&self.body, self.encoding) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(error = %e, "decompression failed, using raw body");
                self.body
            }
        }
    }

    /// Decompressed body decoded to UTF-8.
    #[must_use]
    pub fn into_html(self) -> String {
        let content_type = self.content_type.clone();
        let bytes = self.into_bytes();
        encoding::decode_body(&bytes, content_type.as_deref())
    }
}
