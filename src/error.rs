//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for groups, peers and the HTTP surface.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Caller passed an unusable argument (e.g. an empty key)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No group is registered under the requested name
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// The source loader failed; carried through untouched
    #[error(transparent)]
    Load(anyhow::Error),

    /// Remote peer fetch failed
    #[error("Peer error: {0}")]
    Peer(String),

    /// Setup-time programmer error
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CacheError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Load(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::Peer(_) => StatusCode::BAD_GATEWAY,
            CacheError::Precondition(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
