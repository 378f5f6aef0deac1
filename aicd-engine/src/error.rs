//! Error types for aicd-engine
//!
//! Every handler error becomes `{"error": {"code", "message"}}` with a
//! matching HTTP status.

use crate::session::AnalysisError;
use crate::types::MediaError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upload is not usable media (400)
    #[error("Invalid media: {0}")]
    Media(#[from] MediaError),

    /// Analysis machinery failed (500)
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Media(ref err) => (StatusCode::BAD_REQUEST, "INVALID_MEDIA", err.to_string()),
            ApiError::Analysis(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ANALYSIS_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_errors_are_client_errors() {
        let response = ApiError::from(MediaError::Unsupported("text/plain".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_bad_request_status() {
        let response = ApiError::BadRequest("pixels is not valid base64".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analysis_failures_are_server_errors() {
        let handle: tokio::task::JoinHandle<()> = tokio::spawn(async { panic!("scorer crashed") });
        let join_error = handle.await.unwrap_err();
        let response = ApiError::from(AnalysisError::from(join_error)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
