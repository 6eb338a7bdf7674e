//! HTTP error responses.

use axum::{
    extract::rejection::{BytesRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::ShieldError;

/// Error body returned by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
}

/// API error that converts to a `{ "error": ... }` response
#[derive(Debug)]
pub struct ApiError {
    /// Response status
    pub status: StatusCode,
    /// Message sent to the client
    pub message: String,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400 with the given message
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Map a library error, hiding internal detail behind `public_message`.
    ///
    /// Client errors keep their own message; everything else is logged and
    /// answered with a generic 500.
    pub fn from_shield(err: &ShieldError, public_message: &str) -> Self {
        if err.is_client_error() {
            return Self::bad_request(err.to_string());
        }
        tracing::error!("{}: {}", public_message, err);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, public_message)
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}
