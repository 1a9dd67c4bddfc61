use std::borrow::Cow;
use std::fmt;
use std::io::Read;

use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use http::header::CONTENT_ENCODING;
use http::{HeaderMap, StatusCode, Uri};

use crate::transport::RawResponse;
use crate::Error;

/// The final response of an execute, together with the uri of the hop that
/// produced it.
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    last_effective_uri: Uri,
}

impl Response {
    pub(crate) fn new(raw: RawResponse, last_effective_uri: Uri) -> Self {
        Response {
            status: raw.status,
            headers: raw.headers,
            body: raw.body,
            last_effective_uri,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> u16 {
        self.status.as_u16()
    }

    /// All response headers, repeated values included.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Single-value header lookup. When the transport reports repeats of
    /// the same name, the last value wins. Use [`Response::headers`] to see
    /// every value (`Set-Cookie` in particular is commonly repeated).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get_all(name)
            .iter()
            .last()
            .and_then(|v| v.to_str().ok())
    }

    /// The uri whose request produced this response. Differs from the
    /// originally requested uri once a redirect has been followed.
    pub fn last_effective_uri(&self) -> &Uri {
        &self.last_effective_uri
    }

    /// The body, decompressed according to `Content-Encoding`.
    ///
    /// `gzip` and `deflate` are decoded on demand; any other (or absent)
    /// encoding returns the raw bytes as-is. Deflate accepts both the
    /// zlib-wrapped and the raw form.
    pub fn body(&self) -> Result<Cow<'_, [u8]>, Error> {
        let encoding = self.header(CONTENT_ENCODING.as_str()).unwrap_or("");

        if encoding.eq_ignore_ascii_case("gzip") {
            gunzip(&self.body).map(Cow::Owned)
        } else if encoding.eq_ignore_ascii_case("deflate") {
            inflate(&self.body).map(Cow::Owned)
        } else {
            Ok(Cow::Borrowed(&self.body))
        }
    }

    /// The decoded body as text (lossy utf-8).
    pub fn text(&self) -> Result<String, Error> {
        let body = self.body()?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// The body bytes exactly as the transport returned them.
    pub fn raw_body(&self) -> &[u8] {
        &self.body
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("last_effective_uri", &self.last_effective_uri)
            .finish()
    }
}

fn gunzip(bytes: &[u8]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(|e| Error::Decode(e.to_string()))?;
    Ok(out)
}

fn inflate(bytes: &[u8]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();

    if ZlibDecoder::new(bytes).read_to_end(&mut out).is_ok() {
        return Ok(out);
    }

    out.clear();
    DeflateDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(|e| Error::Decode(e.to_string()))?;
    Ok(out)
}
