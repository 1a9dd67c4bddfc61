//! Request building and the redirect loop.
//!
//! A [`Request`] is an immutable descriptor: verb, uri, headers, body and
//! execution settings, validated up front. Executing it runs a bounded
//! state machine around the transport. After every attempt the engine
//! either follows a redirect or is done:
//!
//! ```text
//! ┌──────────────────┐
//! │     Initial      │
//! └──────────────────┘
//!           │
//!           ▼
//! ┌──────────────────┐      ┌──────────────────┐
//! │     Executed     │─────▶│   Redirecting    │
//! └──────────────────┘◀─────└──────────────────┘
//!           │
//!           ▼
//! ┌──────────────────┐
//! │       Done       │
//! └──────────────────┘
//! ```
//!
//! The transition to Redirecting happens only while fewer than
//! `max_redirects` hops were followed and the status is one of 301, 302,
//! 303, 307 or 308 with a resolvable `Location`. 301/302/303 rewrite the
//! next hop to a bodyless GET; 307/308 resend the original verb and body.
//! Everything else ends the loop and the response is returned as-is, a
//! final un-followed redirect included.
//!
//! The cookie jar is consulted before and updated after every attempt, so
//! a cookie set on the first hop rides along on every later hop.
//!
//! # Example
//!
//! ```
//! use uhop::http::StatusCode;
//! use uhop::{Client, Error, RawResponse, RequestOptions, Transport, TransportRequest};
//!
//! // A canned transport standing in for real I/O.
//! struct Canned;
//!
//! impl Transport for Canned {
//!     fn call(&mut self, _request: TransportRequest<'_>) -> Result<RawResponse, Error> {
//!         Ok(RawResponse {
//!             status: StatusCode::OK,
//!             headers: Default::default(),
//!             body: b"Hello World!".to_vec(),
//!         })
//!     }
//! }
//!
//! let mut client = Client::new(Canned);
//! let response = client.get("http://example.org/", RequestOptions::new())?;
//!
//! assert_eq!(response.code(), 200);
//! assert_eq!(response.text()?, "Hello World!");
//! # Ok::<(), Error>(())
//! ```

use http::header::USER_AGENT;
use http::{HeaderName, HeaderValue, Method};

use crate::transport::Transport;
use crate::Error;

mod flow;

mod options;
pub use options::{Auth, OptionValue, RequestOptions, VALID_OPTIONS};

mod request;
pub use request::{resolve_verb, Request};

mod response;
pub use response::Response;


/// Immutable client-wide configuration: the default header set merged under
/// caller headers on every request.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub default_headers: Vec<(HeaderName, HeaderValue)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            default_headers: vec![(
                USER_AGENT,
                HeaderValue::from_static(concat!("uhop/", env!("CARGO_PKG_VERSION"))),
            )],
        }
    }
}

/// An http client over a [`Transport`].
///
/// The verb helpers build and execute in one call. The lower-level
/// [`Client::request`]/[`Client::execute`] pair separates validation from
/// execution for callers that need to build once.
pub struct Client<T: Transport> {
    transport: T,
    config: ClientConfig,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Client { transport, config }
    }

    /// Build a request descriptor without executing it.
    pub fn request(
        &self,
        method: Method,
        uri: &str,
        options: RequestOptions,
    ) -> Result<Request, Error> {
        Request::build(method, uri, options, &self.config)
    }

    /// Execute a previously built request: 1 + up to `max_redirects`
    /// transport round-trips, blocking until the final response.
    pub fn execute(&mut self, request: &Request) -> Result<Response, Error> {
        flow::execute(request, &mut self.transport)
    }

    pub fn get(&mut self, uri: &str, options: RequestOptions) -> Result<Response, Error> {
        self.call(Method::GET, uri, options)
    }

    pub fn put(&mut self, uri: &str, options: RequestOptions) -> Result<Response, Error> {
        self.call(Method::PUT, uri, options)
    }

    pub fn post(&mut self, uri: &str, options: RequestOptions) -> Result<Response, Error> {
        self.call(Method::POST, uri, options)
    }

    pub fn delete(&mut self, uri: &str, options: RequestOptions) -> Result<Response, Error> {
        self.call(Method::DELETE, uri, options)
    }

    pub fn options(&mut self, uri: &str, options: RequestOptions) -> Result<Response, Error> {
        self.call(Method::OPTIONS, uri, options)
    }

    pub fn trace(&mut self, uri: &str, options: RequestOptions) -> Result<Response, Error> {
        self.call(Method::TRACE, uri, options)
    }

    fn call(
        &mut self,
        method: Method,
        uri: &str,
        options: RequestOptions,
    ) -> Result<Response, Error> {
        let request = self.request(method, uri, options)?;
        self.execute(&request)
    }
}
