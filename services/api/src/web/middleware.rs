//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting the admin routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use feedback_core::ports::PortError;
use std::sync::Arc;
use tracing::error;

use crate::web::error::WebError;
use crate::web::state::AppState;

/// The validated bearer token, made available to handlers via extensions.
#[derive(Debug, Clone)]
pub struct AdminToken(pub String);

/// Middleware that validates the `Authorization: Bearer <token>` header
/// against the session store.
///
/// If valid, inserts the token into request extensions for handlers to use.
/// If missing, invalid, or expired, returns 401 Unauthorized.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    // 1. Extract the Authorization header
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| WebError::Unauthorized("Not authenticated".to_string()))?;

    // 2. Strip the bearer scheme, taking ownership so the header borrow ends
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| WebError::Unauthorized("Not authenticated".to_string()))?
        .to_string();

    // 3. Check the token against the session store
    state.sessions.validate(&token).await.map_err(|e| match e {
        PortError::Unauthorized(message) => WebError::Unauthorized(message),
        other => {
            error!("Failed to validate admin session: {:?}", other);
            WebError::Internal("Authentication check failed".to_string())
        }
    })?;

    // 4. Insert the token into request extensions
    req.extensions_mut().insert(AdminToken(token));

    // 5. Continue to the handler
    Ok(next.run(req).await)
}
