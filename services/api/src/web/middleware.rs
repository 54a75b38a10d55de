//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, error};

use crate::web::error::WebError;
use crate::web::state::{AppState, AuthenticatedUser};

const BEARER_PREFIX: &str = "Bearer ";

/// Middleware that verifies the bearer credential and extracts the subject.
///
/// If valid, inserts an `AuthenticatedUser` into request extensions for handlers to use.
/// If missing or invalid, returns 401 Unauthorized before any handler runs.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    // 1. Extract the authorization header
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(WebError::MissingToken)?;

    // 2. Strip the scheme prefix when present; an empty credential counts as missing
    let token = header_value
        .strip_prefix(BEARER_PREFIX)
        .unwrap_or(header_value)
        .trim();
    if token.is_empty() {
        return Err(WebError::MissingToken);
    }
    let token = token.to_string();

    // 3. Verify with the identity provider, get the subject
    let uid = state.identity.verify_token(&token).await.map_err(|e| {
        error!("Token verification error: {}", e);
        WebError::InvalidToken
    })?;
    debug!("Authenticated request for user {}", uid);

    // 4. Insert the user into request extensions
    req.extensions_mut().insert(AuthenticatedUser { uid });

    // 5. Continue to the handler
    Ok(next.run(req).await)
}
