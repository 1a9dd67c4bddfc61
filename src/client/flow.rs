//! The redirect engine.
//!
//! One execute is a bounded loop of transport attempts. The loop state
//! lives in `RedirectState`, created fresh per execute and dropped when
//! the final response is produced; the request descriptor itself is never
//! mutated.

use http::header::{COOKIE, HOST, LOCATION};
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use smallvec::SmallVec;

use crate::ext::StatusExt;
use crate::transport::{RawResponse, Transport, TransportRequest};
use crate::{uri, Error};

use super::request::Request;
use super::response::Response;

/// Loop state: how many redirects were followed, where the next attempt
/// goes, and the (possibly rewritten) method and body it carries.
struct RedirectState {
    followed: u32,
    uri: Uri,
    method: Method,
    body: Option<Vec<u8>>,
}

pub(crate) fn execute<T: Transport>(
    request: &Request,
    transport: &mut T,
) -> Result<Response, Error> {
    let mut state = RedirectState::new(request);

    loop {
        let raw = state.attempt(request, transport)?;

        request.jar().store_response(&state.uri, &raw.headers);

        if state.followed >= request.max_redirects() {
            return Ok(state.finish(raw));
        }

        if !raw.status.is_followable_redirect() {
            return Ok(state.finish(raw));
        }

        // A redirect status without a location is terminal, not an error.
        let location = raw
            .headers
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let Some(location) = location else {
            return Ok(state.finish(raw));
        };

        state.follow(&location, raw.status)?;
    }
}

impl RedirectState {
    fn new(request: &Request) -> Self {
        RedirectState {
            followed: 0,
            uri: request.uri().clone(),
            method: request.method().clone(),
            body: request.body().map(|b| b.to_vec()),
        }
    }

    /// Run one transport attempt for the current target.
    fn attempt<T: Transport>(
        &self,
        request: &Request,
        transport: &mut T,
    ) -> Result<RawResponse, Error> {
        let mut amend: SmallVec<[(HeaderName, HeaderValue); 2]> = SmallVec::new();

        // Host is recomputed from the target on every hop. On the first
        // attempt a caller-supplied value stands.
        if self.followed > 0 || !request.headers().contains_key(HOST) {
            let host = uri::host_value(&self.uri);
            let value =
                HeaderValue::from_str(&host).map_err(|e| Error::BadHeader(e.to_string()))?;
            amend.push((HOST, value));
        }

        // The jar owns the cookie header; an applicable cookie replaces any
        // caller-supplied value.
        if let Some(cookie) = request.jar().value_for(&self.uri) {
            trace!("attach cookie for {}: {}", self.uri, cookie);
            let value =
                HeaderValue::from_str(&cookie).map_err(|e| Error::BadHeader(e.to_string()))?;
            amend.push((COOKIE, value));
        }

        let mut headers: HeaderMap = request.headers().clone();
        for (name, value) in amend {
            headers.insert(name, value);
        }

        transport.call(TransportRequest {
            method: self.method.clone(),
            uri: self.uri.clone(),
            headers,
            body: self.body.as_deref(),
            timeouts: request.timeouts(),
            ssl_verify: request.ssl_verify(),
        })
    }

    /// Rewrite the state for the next hop according to the status code.
    fn follow(&mut self, location: &str, status: StatusCode) -> Result<(), Error> {
        let next = uri::resolve_location(&self.uri, location)?;

        if status.is_redirect_retaining_method() {
            // 307/308: same method, byte-identical body.
        } else if status.is_followable_redirect() {
            // 301/302/303: the next hop is a bodyless GET regardless of
            // the original verb.
            self.method = Method::GET;
            self.body = None;
        } else {
            return Err(Error::RedirectProtocol(status));
        }

        debug!("redirect {} {} -> {}", status.as_u16(), self.uri, next);

        self.uri = next;
        self.followed += 1;

        Ok(())
    }

    fn finish(self, raw: RawResponse) -> Response {
        Response::new(raw, self.uri)
    }
}
