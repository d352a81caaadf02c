//! Stable error codes and the JSON error body returned by every route.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// An error that carries a stable machine-readable code.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Wire shape of a failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

impl ErrorBody {
    pub fn from_error(err: &dyn ErrorCode) -> Self {
        Self { error: err.to_string(), code: err.error_code() }
    }
}

/// Build a JSON error response with the given status.
pub fn error_response(status: StatusCode, err: &dyn ErrorCode) -> Response {
    (status, Json(ErrorBody::from_error(err))).into_response()
}
