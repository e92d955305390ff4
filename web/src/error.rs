use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use domain::error::{DomainErrorKind, Error as DomainError, InternalErrorKind};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Errors raised by the web layer itself, before any domain call is made.
    Web(WebErrorKind),
    /// Errors bubbling up from the domain layer.
    Domain(DomainError),
}

#[derive(Debug, PartialEq)]
pub enum WebErrorKind {
    MissingAuthorizationCode,
}

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// Response bodies are deliberately generic: upstream provider detail is logged
// server-side and never surfaced to the caller.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Web(WebErrorKind::MissingAuthorizationCode) => {
                (StatusCode::BAD_REQUEST, "Missing authorization code").into_response()
            }
            Error::Domain(domain_error) => match domain_error.error_kind {
                DomainErrorKind::External(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Token exchange failed").into_response()
                }
                DomainErrorKind::Internal(InternalErrorKind::Jwt) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "JWT parse failed").into_response()
                }
                DomainErrorKind::Internal(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
            },
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self::Domain(err.into())
    }
}
