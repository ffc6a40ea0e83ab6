//! Error types for the query cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the query cache.
///
/// The cache itself cannot become unavailable; the only failures it reports
/// are caller contract violations. Data-source failures seen by the resolver
/// layer are carried through `Source` untouched.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Caller passed an argument the cache refuses to interpret
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The wrapped data source failed
    #[error(transparent)]
    Source(#[from] anyhow::Error),
}

impl CacheError {
    /// Shorthand for building an `InvalidArgument` error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        CacheError::InvalidArgument(msg.into())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CacheError::Source(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the query cache.
pub type Result<T> = std::result::Result<T, CacheError>;
