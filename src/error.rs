//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

// == Cache Error Enum ==
/// Unified error type for cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The cache was constructed with unusable settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Refresh targeted a key that does not exist
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Failure reported by the backing document store
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The caller cancelled the operation
    #[error("Operation cancelled")]
    Cancelled,
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            CacheError::Store(StoreError::PreconditionFailed(_)) => StatusCode::CONFLICT,
            CacheError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Configuration(_) | CacheError::Cancelled => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
