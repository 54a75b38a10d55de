//! services/api/src/web/error.rs
//!
//! Route-level errors and their JSON bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors a protected route can answer with. Implements `IntoResponse` so
/// handlers and middleware can return `Result<T, WebError>`.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("No token provided")]
    MissingToken,

    /// The verification failure reason is logged, never returned.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("{error}: {details}")]
    Failed { error: &'static str, details: String },
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            WebError::MissingToken | WebError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": self.to_string() }),
            ),
            WebError::Failed { error, details } => {
                tracing::error!("{}: {}", error, details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": error, "details": details }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
