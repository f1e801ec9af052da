//! HTTP error responses.
//!
//! Every failure is answered with `{"error": "<message>"}` and a status
//! code matching the cause.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use humansize::{format_size, BINARY};
use serde_json::json;

use crate::stats::AnalysisError;

/// Errors returned by the upload endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No file provided")]
    MissingFile,

    #[error("Empty filename")]
    EmptyFilename,

    #[error("Malformed upload: {0}")]
    Multipart(String),

    #[error("Upload exceeds the {} limit", human_size(.limit))]
    PayloadTooLarge { limit: u64 },

    #[error("Analysis timed out after {secs} seconds")]
    Timeout { secs: u64 },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn human_size(bytes: &u64) -> String {
    format_size(*bytes, BINARY)
}

impl ApiError {
    /// Map a multipart read failure, keeping body-limit rejections distinct.
    pub fn from_multipart(error: MultipartError, limit: u64) -> Self {
        if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge { limit }
        } else {
            ApiError::Multipart(error.body_text())
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile | ApiError::EmptyFilename | ApiError::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Analysis(e) if e.is_input_error() => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Analysis(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
