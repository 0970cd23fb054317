//! Error types for the request boundary

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;

/// Errors surfaced to API callers. Probe-level failures never reach this
/// type: the liveness checker folds them into its verdict and the diagnostic
/// reporter carries them inside the report.
#[derive(Debug)]
pub enum ApiError {
    /// Request was missing a required parameter or carried an unusable one
    InvalidInput(String),

    /// Unexpected failure while handling a request (e.g. unreadable body)
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::InvalidInput(msg) => {
                HttpResponse::BadRequest().json(json!({ "error": msg }))
            }
            // Same envelope shape as the happy path of the check endpoint,
            // with a null data field.
            ApiError::Internal(msg) => HttpResponse::InternalServerError().json(json!({
                "status": 500,
                "message": msg,
                "data": null
            })),
        }
    }
}
