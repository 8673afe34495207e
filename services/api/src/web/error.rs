//! services/api/src/web/error.rs
//!
//! Error type returned by the HTTP handlers. Every failure becomes the same
//! JSON envelope so both dashboards can render errors uniformly.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// The JSON body sent with every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub detail: String,
}

/// Handler-level failures, already reduced to what the caller may see.
/// Internal detail is logged at the point of failure, never carried here.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Internal(String),
}

impl WebError {
    fn status(&self) -> StatusCode {
        match self {
            WebError::Validation(_) => StatusCode::BAD_REQUEST,
            WebError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            WebError::Validation(_) => "Validation Error",
            WebError::Unauthorized(_) => "Unauthorized",
            WebError::Internal(_) => "Internal Server Error",
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            success: false,
            error: self.label().to_string(),
            detail: self.to_string(),
        });

        match self {
            WebError::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                body,
            )
                .into_response(),
            _ => (self.status(), body).into_response(),
        }
    }
}
