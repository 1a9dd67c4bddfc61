//! Transport-agnostic http client core.
//!
//! uhop does the client-side thinking around an http exchange: building a
//! validated request, following redirects within a bound, carrying cookies
//! across hops, encoding multipart bodies and decoding compressed response
//! bodies. It does no I/O of its own. The actual network round-trip is
//! behind the [`Transport`] trait: implement it over whatever socket/TLS
//! stack the application already has, then drive requests through a
//! [`Client`].
//!
//! One call to [`Client::execute`] (or a verb helper) is one logical
//! request: the initial attempt plus up to `max_redirects` follow-up hops,
//! each a fresh transport round-trip with per-attempt timeouts. See the
//! [`client`] module for the state machine.

#[macro_use]
extern crate log;

// Re-export the basis for this library.
pub use http;

mod error;
pub use error::Error;

mod ext;
mod uri;

mod multipart;
pub use multipart::Multipart;

mod jar;
pub use jar::CookieJar;

mod transport;
pub use transport::{RawResponse, SslVerify, Timeouts, Transport, TransportRequest};

pub mod client;
pub use client::{Client, ClientConfig, Request, RequestOptions, Response};
