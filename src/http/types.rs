use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// JSON body of the YouTube endpoint.
#[derive(Debug, Deserialize)]
pub struct YoutubeRequest {
    pub url: String,
}

/// Failures surfaced as HTTP error statuses, carried as `{"detail": ...}`
/// bodies. Logical errors (empty content, malformed agent output) never
/// pass through here; those ride in 200 bodies as `{"error": ...}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
