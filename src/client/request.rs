use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};

use crate::ext::MethodExt;
use crate::jar::CookieJar;
use crate::multipart::Multipart;
use crate::transport::{SslVerify, Timeouts};
use crate::{uri, Error};

use super::options::RequestOptions;
use super::ClientConfig;

/// Resolve a free-form verb string to a [`Method`].
///
/// Only GET, HEAD, PUT, POST and DELETE resolve from strings, case
/// insensitively. OPTIONS and TRACE are available as [`Method`] values but
/// not from strings. Anything else fails.
pub fn resolve_verb(verb: &str) -> Result<Method, Error> {
    if verb.eq_ignore_ascii_case("get") {
        Ok(Method::GET)
    } else if verb.eq_ignore_ascii_case("head") {
        Ok(Method::HEAD)
    } else if verb.eq_ignore_ascii_case("put") {
        Ok(Method::PUT)
    } else if verb.eq_ignore_ascii_case("post") {
        Ok(Method::POST)
    } else if verb.eq_ignore_ascii_case("delete") {
        Ok(Method::DELETE)
    } else {
        Err(Error::InvalidArgument(format!("invalid verb {}", verb)))
    }
}

/// An immutable request descriptor, ready to execute.
///
/// Construction validates the verb, the uri and the body rules, and bakes
/// in the encoded body (multipart or urlencoded), auth and headers. The
/// redirect engine never mutates the descriptor; per-hop changes live in
/// its own state.
#[derive(Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    timeouts: Timeouts,
    max_redirects: u32,
    ssl_verify: SslVerify,
    jar: CookieJar,
}

impl Request {
    /// Build a request descriptor from a verb, an absolute uri and options.
    pub fn build(
        method: Method,
        target: &str,
        options: RequestOptions,
        config: &ClientConfig,
    ) -> Result<Request, Error> {
        method.ensure_supported()?;

        let mut target = uri::parse_absolute(target)?;

        let mut headers = caller_headers(&options)?;

        for (name, value) in &config.default_headers {
            if !headers.contains_key(name) {
                headers.insert(name.clone(), value.clone());
            }
        }

        let timeouts = options.resolve_timeouts();
        let mut body = None;

        if !options.files.is_empty() {
            ensure_body_allowed(&method)?;

            let mut form = Multipart::new();
            for (name, value) in &options.query {
                form.field(name.as_str(), value.as_str());
            }
            for (name, path) in &options.files {
                form.file(name.as_str(), path)?;
            }

            headers.insert(CONTENT_TYPE, header_value(&form.content_type())?);
            body = Some(form.body());
        } else if !options.query.is_empty() {
            if method.allows_body() {
                headers.insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("application/x-www-form-urlencoded"),
                );
                body = Some(uri::form_encode(&options.query).into_bytes());
            } else {
                target = uri::append_query(&target, &options.query)?;
            }
        }

        // An explicit body replaces whatever the encoders produced.
        if let Some(explicit) = options.body {
            ensure_body_allowed(&method)?;
            body = Some(explicit);
        }

        if let Some(auth) = &options.auth {
            let value = format!(
                "Basic {}",
                BASE64.encode(format!("{}:{}", auth.username, auth.password))
            );
            headers.insert(AUTHORIZATION, header_value(&value)?);
        }

        Ok(Request {
            method,
            uri: target,
            headers,
            body,
            timeouts,
            max_redirects: options.max_redirects,
            ssl_verify: options.ssl_verify,
            jar: options.jar.unwrap_or_default(),
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    pub fn max_redirects(&self) -> u32 {
        self.max_redirects
    }

    pub fn ssl_verify(&self) -> SslVerify {
        self.ssl_verify
    }

    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }
}

fn ensure_body_allowed(method: &Method) -> Result<(), Error> {
    if method.allows_body() {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "{} cannot have a body",
            method
        )))
    }
}

fn caller_headers(options: &RequestOptions) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();

    for (name, value) in &options.headers {
        let name = HeaderName::try_from(name.as_str())
            .map_err(|e| Error::BadHeader(e.to_string()))?;
        headers.append(name, header_value(value)?);
    }

    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value).map_err(|e| Error::BadHeader(e.to_string()))
}

#[cfg(test)]
mod test {
    use super::*;
    use http::header::USER_AGENT;

    fn build(method: Method, uri: &str, options: RequestOptions) -> Result<Request, Error> {
        Request::build(method, uri, options, &ClientConfig::default())
    }

    #[test]
    fn verb_strings_resolve_case_insensitively() {
        assert_eq!(resolve_verb("get").unwrap(), Method::GET);
        assert_eq!(resolve_verb("GET").unwrap(), Method::GET);
        assert_eq!(resolve_verb("Head").unwrap(), Method::HEAD);
        assert_eq!(resolve_verb("put").unwrap(), Method::PUT);
        assert_eq!(resolve_verb("POST").unwrap(), Method::POST);
        assert_eq!(resolve_verb("delete").unwrap(), Method::DELETE);
    }

    #[test]
    fn verb_strings_fail_closed() {
        for verb in ["options", "trace", "patch", "foo", ""] {
            assert!(matches!(
                resolve_verb(verb),
                Err(Error::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn unsupported_method_rejected() {
        let err = build(Method::PATCH, "http://a.test/", RequestOptions::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn invalid_uris_rejected() {
        for target in ["http://", "/hello", "example.org"] {
            let err = build(Method::GET, target, RequestOptions::new()).unwrap_err();
            assert!(matches!(err, Error::InvalidUri(_)), "{}", target);
        }
    }

    #[test]
    fn body_rejected_on_body_incapable_verbs() {
        for method in [
            Method::GET,
            Method::HEAD,
            Method::DELETE,
            Method::OPTIONS,
            Method::TRACE,
        ] {
            let options = RequestOptions::new().body("hi");
            let err = build(method.clone(), "http://a.test/", options).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{}", method);
        }
    }

    #[test]
    fn files_rejected_on_body_incapable_verbs() {
        let options = RequestOptions::new().file("f", "/tmp/x");
        let err = build(Method::GET, "http://a.test/", options).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn default_user_agent_applied() {
        let request = build(Method::GET, "http://a.test/", RequestOptions::new()).unwrap();

        let agent = request.headers().get(USER_AGENT).unwrap();
        assert_eq!(
            agent.to_str().unwrap(),
            concat!("uhop/", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn caller_header_wins_over_default() {
        let options = RequestOptions::new().header("User-Agent", "custom/1.0");
        let request = build(Method::GET, "http://a.test/", options).unwrap();

        assert_eq!(request.headers().get(USER_AGENT).unwrap(), "custom/1.0");
    }

    #[test]
    fn query_becomes_body_for_post() {
        let options = RequestOptions::new().query("test1", "test2");
        let request = build(Method::POST, "http://a.test/", options).unwrap();

        assert_eq!(request.body(), Some(&b"test1=test2"[..]));
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(request.uri().query(), None);
    }

    #[test]
    fn query_appends_to_uri_for_get() {
        let options = RequestOptions::new().query("test1", "test2");
        let request = build(Method::GET, "http://a.test/x", options).unwrap();

        assert_eq!(request.uri().query(), Some("test1=test2"));
        assert_eq!(request.body(), None);
    }

    #[test]
    fn files_produce_multipart_body() {
        let dir = std::env::temp_dir().join("uhop-request-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("part.txt");
        std::fs::write(&path, b"content").unwrap();

        let options = RequestOptions::new().query("test1", "test2").file("f", &path);
        let request = build(Method::POST, "http://a.test/", options).unwrap();

        let content_type = request.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));

        let body = String::from_utf8_lossy(request.body().unwrap()).into_owned();
        assert!(body.contains("name=\"test1\""));
        assert!(body.contains("test2"));
        assert!(body.contains("filename=\"part.txt\""));
        assert!(body.contains("content"));
    }

    #[test]
    fn explicit_body_replaces_encoded_body() {
        let options = RequestOptions::new().query("a", "b").body("raw");
        let request = build(Method::POST, "http://a.test/", options).unwrap();

        assert_eq!(request.body(), Some(&b"raw"[..]));
    }

    #[test]
    fn basic_auth_header() {
        let options = RequestOptions::new().auth("user", "pass");
        let request = build(Method::GET, "http://a.test/", options).unwrap();

        // base64("user:pass")
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Basic dXNlcjpwYXNz"
        );
    }

    #[test]
    fn defaults() {
        let request = build(Method::GET, "http://a.test/", RequestOptions::new()).unwrap();

        assert_eq!(request.max_redirects(), 0);
        assert_eq!(request.ssl_verify(), SslVerify::Peer);
        assert_eq!(request.timeouts(), Timeouts::default());
    }
}
