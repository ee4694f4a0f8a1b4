use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the request pool, the client façade, and the REST
/// handlers.
///
/// Per-request failures (`Connection`, `Http`, `Decode`, `Cancelled`) are
/// captured inside the request's [`ResponseRecord`](crate::request::ResponseRecord)
/// and never disturb other in-flight requests. `InvalidConfig` and
/// `PoolClosed` are returned synchronously to the caller that triggered them,
/// and `Timeout` only ever comes out of a timed result retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("pool is closed to new submissions")]
    PoolClosed,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("timed out waiting for a result")]
    Timeout,

    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("failed to decode response body: {0}")]
    Decode(String),

    #[error("request was cancelled before dispatch")]
    Cancelled,
}

/// JSON error body returned by the REST server.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    pub code: u16,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Decode(_) => StatusCode::BAD_REQUEST,
            Error::Http { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Error::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Error::Connection(_) => StatusCode::BAD_GATEWAY,
            Error::InvalidConfig(_) | Error::PoolClosed | Error::Cancelled => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Error::InvalidConfig(_) => "invalid_config",
            Error::PoolClosed => "pool_closed",
            Error::Connection(_) => "connection_error",
            Error::Timeout => "timeout",
            Error::Http { .. } => "http_error",
            Error::Decode(_) => "decode_error",
            Error::Cancelled => "cancelled",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_map_to_bad_request() {
        let err = Error::Decode("'input' not found".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "decode_error");
    }

    #[test]
    fn http_errors_keep_their_status() {
        let err = Error::Http {
            status: 404,
            body: String::new(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn timeout_is_not_a_request_error() {
        assert_ne!(Error::Timeout, Error::Connection("timed out".to_string()));
        assert_eq!(Error::Timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }
}
