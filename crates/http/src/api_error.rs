//! Typed API error for HTTP handlers.
//!
//! Handlers return `Result<Json<T>, ApiError>`; the error renders as a JSON
//! body `{"error": "message"}` with a matching status code.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use repairdesk_service::ServiceError;

#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request: malformed body or invalid field values.
    BadRequest(String),
    /// 404 Not Found: unknown session or booking id.
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };
        let body = serde_json::json!({"error": message});
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(msg) => Self::BadRequest(msg),
            ServiceError::NotFound { .. } => Self::NotFound(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
