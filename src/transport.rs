//! The transport boundary.
//!
//! uhop builds requests and interprets responses; it never touches the
//! network. One fully-described attempt goes out through [`Transport::call`]
//! and comes back as a parsed [`RawResponse`]. Connection handling, TLS and
//! wire parsing all belong to the transport implementation.

use std::time::Duration;

use http::{HeaderMap, Method, StatusCode, Uri};

use crate::Error;

/// Performs one network round-trip for a fully-built request.
///
/// Implementations must report timeouts distinctly: [`Error::ConnectTimeout`]
/// for connection establishment, [`Error::ReadTimeout`] for reading the
/// response, [`Error::TlsTimeout`] for the TLS handshake and [`Error::Io`]
/// for everything else. The redirect engine never retries a failed attempt.
pub trait Transport {
    fn call(&mut self, request: TransportRequest<'_>) -> Result<RawResponse, Error>;
}

/// One attempt, as handed to the transport. Headers are already complete,
/// including per-hop `Host` and `Cookie` values.
#[derive(Debug)]
pub struct TransportRequest<'a> {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Option<&'a [u8]>,
    pub timeouts: Timeouts,
    pub ssl_verify: SslVerify,
}

/// A parsed response as produced by the transport. Repeated headers (such
/// as `Set-Cookie`) must all be present in the map.
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Per-attempt timeouts. `None` means the transport default applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeouts {
    pub open: Option<Duration>,
    pub read: Option<Duration>,
    pub ssl: Option<Duration>,
}

/// TLS certificate verification mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SslVerify {
    #[default]
    Peer,
    None,
}
