//! API error responses
//!
//! Maps store errors onto HTTP status codes with a `{"error": message}` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chordlab_common::Error;
use serde_json::json;
use tracing::error;

/// Handler errors
#[derive(Debug)]
pub enum ApiError {
    /// Failure reported by the song store
    Store(Error),
    /// No song with this id
    NotFound(String),
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError::Store(e)
    }
}

impl ApiError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            ApiError::NotFound(id) => (StatusCode::NOT_FOUND, format!("Song not found: {}", id)),
            ApiError::Store(e @ Error::Validation(_)) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Store(e) => {
                error!("Request failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
