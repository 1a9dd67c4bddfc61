//! Absolute URI validation and `Location` resolution.

use http::Uri;
use url::Url;

use crate::Error;

/// Parse a string into an absolute http/https URI with a non-empty host.
pub(crate) fn parse_absolute(s: &str) -> Result<Uri, Error> {
    let uri: Uri = s.parse().map_err(|_| Error::InvalidUri(s.to_string()))?;
    ensure_absolute_http(&uri)?;
    Ok(uri)
}

pub(crate) fn ensure_absolute_http(uri: &Uri) -> Result<(), Error> {
    let scheme_ok = matches!(uri.scheme_str(), Some("http") | Some("https"));
    let host_ok = uri.host().map(|h| !h.is_empty()).unwrap_or(false);

    if !scheme_ok || !host_ok {
        return Err(Error::InvalidUri(uri.to_string()));
    }

    Ok(())
}

/// Resolve a `Location` header value against the uri that produced it.
///
/// The location may be absolute or relative. The result must again be an
/// absolute http/https uri.
pub(crate) fn resolve_location(base: &Uri, location: &str) -> Result<Uri, Error> {
    let base = Url::parse(&base.to_string()).expect("base uri to be a url");

    let url = base
        .join(location)
        .map_err(|_| Error::InvalidUri(location.to_string()))?;

    let uri: Uri = url
        .as_str()
        .parse()
        .map_err(|_| Error::InvalidUri(location.to_string()))?;

    ensure_absolute_http(&uri)?;

    Ok(uri)
}

/// The `Host` header value for a uri: `host` or `host:port` when the
/// port is explicit and not the scheme default.
pub(crate) fn host_value(uri: &Uri) -> String {
    let host = uri.host().unwrap_or_default();

    match uri.port_u16() {
        Some(port) if Some(port) != default_port(uri) => format!("{}:{}", host, port),
        _ => host.to_string(),
    }
}

fn default_port(uri: &Uri) -> Option<u16> {
    match uri.scheme_str() {
        Some("http") => Some(80),
        Some("https") => Some(443),
        _ => None,
    }
}

/// Url-encode pairs for an `application/x-www-form-urlencoded` body.
pub(crate) fn form_encode(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish()
}

/// Append pairs to the uri query string, keeping any existing query.
pub(crate) fn append_query(uri: &Uri, pairs: &[(String, String)]) -> Result<Uri, Error> {
    let mut url = Url::parse(&uri.to_string()).expect("base uri to be a url");

    url.query_pairs_mut()
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    url.as_str()
        .parse()
        .map_err(|_| Error::InvalidUri(url.to_string()))
}
