use std::path::PathBuf;
use std::time::Duration;

use crate::jar::CookieJar;
use crate::transport::{SslVerify, Timeouts};
use crate::Error;

/// The option names a request accepts. Anything else is rejected.
pub const VALID_OPTIONS: &[&str] = &[
    "headers",
    "files",
    "query",
    "body",
    "auth",
    "timeout",
    "open_timeout",
    "ssl_timeout",
    "read_timeout",
    "max_redirects",
    "ssl_verify",
    "jar",
];

/// Options for one request.
///
/// Typed setters cover normal use; [`RequestOptions::apply`] is the keyed
/// surface for callers driven by external configuration, validated against
/// [`VALID_OPTIONS`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub files: Vec<(String, PathBuf)>,
    pub body: Option<Vec<u8>>,
    pub auth: Option<Auth>,
    pub timeout: Option<Duration>,
    pub open_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
    pub ssl_timeout: Option<Duration>,
    pub max_redirects: u32,
    pub ssl_verify: SslVerify,
    pub jar: Option<CookieJar>,
}

/// Basic-auth credentials.
#[derive(Debug, Clone)]
pub struct Auth {
    pub username: String,
    pub password: String,
}

/// A value for [`RequestOptions::apply`].
#[derive(Debug, Clone)]
pub enum OptionValue {
    Pairs(Vec<(String, String)>),
    Text(String),
    Bytes(Vec<u8>),
    Duration(Duration),
    Number(u32),
    Verify(SslVerify),
    Jar(CookieJar),
    Login { username: String, password: String },
}

impl RequestOptions {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn file(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.files.push((name.into(), path.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(Auth {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Seed all three per-attempt timeouts at once. The specific setters
    /// override the seed.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout = Some(timeout);
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn ssl_timeout(mut self, timeout: Duration) -> Self {
        self.ssl_timeout = Some(timeout);
        self
    }

    pub fn max_redirects(mut self, max: u32) -> Self {
        self.max_redirects = max;
        self
    }

    pub fn ssl_verify(mut self, verify: SslVerify) -> Self {
        self.ssl_verify = verify;
        self
    }

    pub fn jar(mut self, jar: CookieJar) -> Self {
        self.jar = Some(jar);
        self
    }

    /// Set an option by name. Unknown names fail closed, as does a value of
    /// the wrong shape for a known name.
    pub fn apply(&mut self, name: &str, value: OptionValue) -> Result<(), Error> {
        match (name, value) {
            ("headers", OptionValue::Pairs(pairs)) => self.headers.extend(pairs),
            ("query", OptionValue::Pairs(pairs)) => self.query.extend(pairs),
            ("files", OptionValue::Pairs(pairs)) => self
                .files
                .extend(pairs.into_iter().map(|(name, path)| (name, path.into()))),
            ("body", OptionValue::Bytes(bytes)) => self.body = Some(bytes),
            ("body", OptionValue::Text(text)) => self.body = Some(text.into_bytes()),
            ("auth", OptionValue::Login { username, password }) => {
                self.auth = Some(Auth { username, password })
            }
            ("timeout", OptionValue::Duration(d)) => self.timeout = Some(d),
            ("open_timeout", OptionValue::Duration(d)) => self.open_timeout = Some(d),
            ("read_timeout", OptionValue::Duration(d)) => self.read_timeout = Some(d),
            ("ssl_timeout", OptionValue::Duration(d)) => self.ssl_timeout = Some(d),
            ("max_redirects", OptionValue::Number(n)) => self.max_redirects = n,
            ("ssl_verify", OptionValue::Verify(v)) => self.ssl_verify = v,
            ("jar", OptionValue::Jar(jar)) => self.jar = Some(jar),
            (name, _) if VALID_OPTIONS.contains(&name) => {
                return Err(Error::InvalidArgument(format!(
                    "bad value for option {}",
                    name
                )))
            }
            (name, _) => {
                return Err(Error::InvalidArgument(format!("unknown option {}", name)));
            }
        }

        Ok(())
    }

    /// The per-attempt timeouts: `timeout` seeds all three, the specific
    /// options override.
    pub(crate) fn resolve_timeouts(&self) -> Timeouts {
        Timeouts {
            open: self.open_timeout.or(self.timeout),
            read: self.read_timeout.or(self.timeout),
            ssl: self.ssl_timeout.or(self.timeout),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unknown_option_rejected_by_name() {
        let mut options = RequestOptions::new();
        let err = options
            .apply("foo", OptionValue::Text("1".into()))
            .unwrap_err();

        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(err.to_string().contains("foo"));
    }

    #[test]
    fn known_option_with_wrong_value_rejected() {
        let mut options = RequestOptions::new();
        let err = options
            .apply("max_redirects", OptionValue::Text("2".into()))
            .unwrap_err();

        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(err.to_string().contains("max_redirects"));
    }

    #[test]
    fn every_listed_option_is_applicable() {
        let mut options = RequestOptions::new();

        options
            .apply("headers", OptionValue::Pairs(vec![("a".into(), "b".into())]))
            .unwrap();
        options
            .apply("query", OptionValue::Pairs(vec![("q".into(), "v".into())]))
            .unwrap();
        options
            .apply("files", OptionValue::Pairs(vec![("f".into(), "/tmp/x".into())]))
            .unwrap();
        options.apply("body", OptionValue::Text("hi".into())).unwrap();
        options
            .apply(
                "auth",
                OptionValue::Login {
                    username: "u".into(),
                    password: "p".into(),
                },
            )
            .unwrap();
        options
            .apply("timeout", OptionValue::Duration(Duration::from_secs(10)))
            .unwrap();
        options
            .apply("open_timeout", OptionValue::Duration(Duration::from_secs(1)))
            .unwrap();
        options
            .apply("read_timeout", OptionValue::Duration(Duration::from_secs(2)))
            .unwrap();
        options
            .apply("ssl_timeout", OptionValue::Duration(Duration::from_secs(3)))
            .unwrap();
        options
            .apply("max_redirects", OptionValue::Number(2))
            .unwrap();
        options
            .apply("ssl_verify", OptionValue::Verify(SslVerify::None))
            .unwrap();
        options.apply("jar", OptionValue::Jar(Default::default())).unwrap();
    }

    #[test]
    fn timeout_seeds_all_three() {
        let options = RequestOptions::new().timeout(Duration::from_secs(10));
        let timeouts = options.resolve_timeouts();

        assert_eq!(timeouts.open, Some(Duration::from_secs(10)));
        assert_eq!(timeouts.read, Some(Duration::from_secs(10)));
        assert_eq!(timeouts.ssl, Some(Duration::from_secs(10)));
    }

    #[test]
    fn specific_timeouts_override_seed() {
        let options = RequestOptions::new()
            .timeout(Duration::from_secs(10))
            .read_timeout(Duration::from_secs(2));
        let timeouts = options.resolve_timeouts();

        assert_eq!(timeouts.open, Some(Duration::from_secs(10)));
        assert_eq!(timeouts.read, Some(Duration::from_secs(2)));
        assert_eq!(timeouts.ssl, Some(Duration::from_secs(10)));
    }

    #[test]
    fn no_timeouts_by_default() {
        assert_eq!(RequestOptions::new().resolve_timeouts(), Timeouts::default());
    }
}
