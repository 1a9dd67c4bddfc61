//! Cookie jar, consumed by the redirect engine.
//!
//! The jar itself is the `cookie_store` crate; this type only adds the
//! uri-keyed read/write surface the engine needs and an internal lock so a
//! single jar can be shared across concurrent executes.

use std::sync::{Arc, Mutex};

use cookie::Cookie;
use cookie_store::CookieStore;
use http::header::SET_COOKIE;
use http::{HeaderMap, Uri};
use url::Url;

/// Shared cookie jar. Cloning is cheap and clones observe each other's
/// updates.
#[derive(Clone, Default)]
pub struct CookieJar {
    store: Arc<Mutex<CookieStore>>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `Cookie` header value for a request to `uri`, or None when no
    /// stored cookie applies.
    pub fn value_for(&self, uri: &Uri) -> Option<String> {
        let url = request_url(uri)?;

        let store = self.store.lock().unwrap();
        let value = store
            .get_request_values(&url)
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");

        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Parse every `Set-Cookie` header in `headers` into the jar, scoped to
    /// the uri that produced the response. Malformed values are skipped.
    pub fn store_response(&self, uri: &Uri, headers: &HeaderMap) {
        let Some(url) = request_url(uri) else {
            return;
        };

        let cookies: Vec<Cookie<'static>> = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|s| match Cookie::parse(s.to_string()) {
                Ok(c) => Some(c),
                Err(e) => {
                    debug!("skipping malformed set-cookie: {}", e);
                    None
                }
            })
            .collect();

        if cookies.is_empty() {
            return;
        }

        let mut store = self.store.lock().unwrap();
        store.store_response_cookies(cookies.into_iter(), &url);
    }
}

fn request_url(uri: &Uri) -> Option<Url> {
    Url::parse(&uri.to_string()).ok()
}

impl std::fmt::Debug for CookieJar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieJar").finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    fn set_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, value.parse().unwrap());
        headers
    }

    #[test]
    fn store_and_read_back() {
        let jar = CookieJar::new();
        let origin = uri("http://a.test/");

        assert_eq!(jar.value_for(&origin), None);

        jar.store_response(&origin, &set_cookie("foo=bar"));
        assert_eq!(jar.value_for(&origin), Some("foo=bar".to_string()));
    }

    #[test]
    fn scoped_to_domain() {
        let jar = CookieJar::new();
        jar.store_response(&uri("http://a.test/"), &set_cookie("foo=bar"));

        assert_eq!(jar.value_for(&uri("http://b.test/")), None);
    }

    #[test]
    fn multiple_set_cookie_headers() {
        let jar = CookieJar::new();
        let origin = uri("http://a.test/");

        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, "one=1".parse().unwrap());
        headers.append(SET_COOKIE, "two=2".parse().unwrap());

        jar.store_response(&origin, &headers);

        let value = jar.value_for(&origin).unwrap();
        assert!(value.contains("one=1"));
        assert!(value.contains("two=2"));
    }

    #[test]
    fn clones_share_state() {
        let jar = CookieJar::new();
        let clone = jar.clone();

        jar.store_response(&uri("http://a.test/"), &set_cookie("foo=bar"));

        assert_eq!(
            clone.value_for(&uri("http://a.test/")),
            Some("foo=bar".to_string())
        );
    }
}
