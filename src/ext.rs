use http::{Method, StatusCode};

use crate::Error;

pub(crate) trait MethodExt {
    fn is_supported(&self) -> bool;
    fn allows_body(&self) -> bool;
    fn ensure_supported(&self) -> Result<(), Error>;
}

impl MethodExt for Method {
    fn is_supported(&self) -> bool {
        self == Method::GET
            || self == Method::HEAD
            || self == Method::PUT
            || self == Method::POST
            || self == Method::DELETE
            || self == Method::OPTIONS
            || self == Method::TRACE
    }

    fn allows_body(&self) -> bool {
        self == Method::PUT || self == Method::POST
    }

    fn ensure_supported(&self) -> Result<(), Error> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!("unsupported verb {}", self)))
        }
    }
}

pub(crate) trait StatusExt {
    /// Any of the five codes the redirect engine follows.
    fn is_followable_redirect(&self) -> bool;

    /// Detect 307/308 redirect
    fn is_redirect_retaining_method(&self) -> bool;
}

impl StatusExt for StatusCode {
    fn is_followable_redirect(&self) -> bool {
        *self == StatusCode::MOVED_PERMANENTLY
            || *self == StatusCode::FOUND
            || *self == StatusCode::SEE_OTHER
            || self.is_redirect_retaining_method()
    }

    fn is_redirect_retaining_method(&self) -> bool {
        *self == StatusCode::TEMPORARY_REDIRECT || *self == StatusCode::PERMANENT_REDIRECT
    }
}
