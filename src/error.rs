use http::StatusCode;
use thiserror::Error;

/// Errors surfaced by request building, execution and response decoding.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid uri: {0}")]
    InvalidUri(String),

    #[error("bad header: {0}")]
    BadHeader(String),

    #[error("connect timed out")]
    ConnectTimeout,

    #[error("read timed out")]
    ReadTimeout,

    #[error("tls handshake timed out or failed")]
    TlsTimeout,

    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode body: {0}")]
    Decode(String),

    #[error("redirect on non-redirect status: {0}")]
    RedirectProtocol(StatusCode),
}

impl Error {
    /// True for the timeout variants a transport reports per attempt.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::ConnectTimeout | Error::ReadTimeout | Error::TlsTimeout
        )
    }
}
