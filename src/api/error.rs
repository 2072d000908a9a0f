use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

use crate::domain::order::OrderError;
use crate::domain::product::ProductError;

/// Error body returned by every endpoint: `{"message": ..., "error": ...}`.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    error: &'a str,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
    error: String,
}

impl ApiError {
    fn new(status: StatusCode, message: &'static str, error: impl fmt::Display) -> Self {
        Self {
            status,
            message,
            error: error.to_string(),
        }
    }

    pub fn bad_request(message: &'static str, error: impl fmt::Display) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, error)
    }

    pub fn payload_too_large(limit: usize) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "request body too large",
            format!("body exceeds {limit} bytes"),
        )
    }

    /// Validation → 400, denied customer → 403, everything else → 500.
    pub fn order(message: &'static str, err: OrderError) -> Self {
        let status = match &err {
            e if e.is_validation() => StatusCode::BAD_REQUEST,
            OrderError::Unauthorized => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, message, err)
    }

    pub fn product(message: &'static str, err: ProductError) -> Self {
        let status = match &err {
            e if e.is_validation() => StatusCode::BAD_REQUEST,
            ProductError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, message, err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message, self.error)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        if self.status.is_server_error() {
            tracing::error!(status = self.status.as_u16(), message = self.message, error = %self.error, "Request failed");
        } else {
            tracing::debug!(status = self.status.as_u16(), message = self.message, error = %self.error, "Request rejected");
        }

        HttpResponse::build(self.status).json(ErrorBody {
            message: self.message,
            error: &self.error,
        })
    }
}
