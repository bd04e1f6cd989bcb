use std::error::Error as StdError;
use std::fmt;
use std::io;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::*;

use crate::response::ErrorResponse;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// No route matched the request.
    NotFound,
    /// The path exists but not for the request method.
    MethodNotAllowed,
    /// The listener could not be bound to the configured address.
    Bind { address: String, source: io::Error },
    /// The server loop stopped with an I/O error.
    Serve(io::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::Bind { .. } | Error::Serve(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound => write!(f, "Not found"),
            Error::MethodNotAllowed => write!(f, "Method not allowed"),
            Error::Bind { address, source } => write!(f, "Failed to bind {address}: {source}"),
            Error::Serve(source) => write!(f, "Server error: {source}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::NotFound | Error::MethodNotAllowed => None,
            Error::Bind { source, .. } | Error::Serve(source) => Some(source),
        }
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            error!("Responding with {status_code}: {self}");
        }

        let reason = status_code
            .canonical_reason()
            .unwrap_or("UNKNOWN")
            .to_uppercase();

        (
            status_code,
            Json(ErrorResponse {
                status_code: status_code.as_u16(),
                error: reason,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let response = Error::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn method_not_allowed_maps_to_405() {
        let response = Error::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn io_failures_map_to_500() {
        let bind = Error::Bind {
            address: "0.0.0.0:8000".to_string(),
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };
        assert_eq!(bind.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(bind.source().is_some());
        assert!(bind.to_string().contains("0.0.0.0:8000"));

        let serve = Error::Serve(io::Error::from(io::ErrorKind::BrokenPipe));
        assert_eq!(
            serve.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
