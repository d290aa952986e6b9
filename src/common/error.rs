// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

/// API error types
///
/// Everything past the multipart boundary maps to a 500: the pipeline either
/// produces a complete response or fails as a whole, never partial results.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    UploadError(String),
    ExtractionError(String),
    CompletionError(String),
    ModelJsonError(String),
    PdfWriteError(String),
    InternalServer(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::UploadError(msg) => write!(f, "Upload error: {}", msg),
            ApiError::ExtractionError(msg) => write!(f, "PDF extraction error: {}", msg),
            ApiError::CompletionError(msg) => write!(f, "Completion error: {}", msg),
            ApiError::ModelJsonError(msg) => write!(f, "{}", msg),
            ApiError::PdfWriteError(msg) => write!(f, "PDF write error: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// JSON error response structure: `{"error": "<message>"}`
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = self.to_string();
        if status.is_server_error() {
            error!(error = %message, "Request failed");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
