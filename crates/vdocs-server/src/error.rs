//! Error types for the HTTP server.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vdocs_site::SiteError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Version token cannot be parsed.
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    /// Page or file not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Fetch, decode or manifest failure.
    #[error(transparent)]
    Site(SiteError),

    /// Blocking task panicked or was cancelled.
    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Response serialization failed.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<SiteError> for ServerError {
    fn from(e: SiteError) -> Self {
        match e {
            SiteError::InvalidVersion(version) => Self::InvalidVersion(version),
            SiteError::NotFound(path) => Self::NotFound(path),
            other => Self::Site(other),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::InvalidVersion(version) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Invalid version", "version": version}),
            ),
            Self::NotFound(path) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Not found", "path": path}),
            ),
            Self::Site(_) | Self::Task(_) | Self::Json(_) => {
                tracing::error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": self.to_string()}),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
