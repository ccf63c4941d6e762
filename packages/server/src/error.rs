use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use common::storage::StorageError;

/// Application-level error type.
///
/// Every variant renders as a `text/plain` body. Storage failures pass the
/// underlying error text through to the client unchanged.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed paste key or form body.
    #[error("bad request")]
    BadRequest,
    /// Request body over the configured limit.
    #[error("paste too large")]
    PayloadTooLarge,
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Unknown bundled asset.
    #[error("{0} not found")]
    NotFound(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::BadRequest => tracing::warn!("Rejected malformed request"),
            AppError::PayloadTooLarge => tracing::warn!("Rejected oversized paste"),
            AppError::Storage(err) => tracing::error!(error = %err, "Storage error"),
            AppError::NotFound(what) => tracing::debug!("{} not found", what),
        }

        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}
