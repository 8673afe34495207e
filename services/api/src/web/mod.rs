//! services/api/src/web/mod.rs
//!
//! Wires the handlers into the application router and carries the master
//! OpenAPI definition.

pub mod admin;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod state;
pub mod user;

pub use middleware::require_admin;
pub use state::AppState;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi, ToSchema,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        user::submit_review_handler,
        user::user_health_handler,
        admin::login_handler,
        admin::logout_handler,
        admin::list_reviews_handler,
        admin::analytics_handler,
        admin::admin_health_handler,
        global_health_handler,
    ),
    components(schemas(
        user::SubmitReviewRequest,
        user::SubmitReviewResponse,
        user::UserHealthResponse,
        admin::LoginRequest,
        admin::LoginResponse,
        admin::MessageResponse,
        admin::ReviewItemResponse,
        admin::ReviewsListResponse,
        admin::AnalyticsResponse,
        admin::AdminHealthResponse,
        error::ErrorBody,
        GlobalHealthResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "User", description = "Review submission endpoints for the user dashboard."),
        (name = "Admin", description = "Authenticated endpoints for the admin dashboard.")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

//=========================================================================================
// Global Health Endpoint
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct GlobalHealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Global liveness check.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = GlobalHealthResponse))
)]
pub async fn global_health_handler() -> Json<GlobalHealthResponse> {
    Json(GlobalHealthResponse {
        status: "healthy".to_string(),
        service: "ai-feedback-system".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

//=========================================================================================
// Router Assembly
//=========================================================================================

/// CORS layer built from the configured origin allowlist. Unparseable
/// entries are skipped with a warning rather than failing startup.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "skipping unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
}

/// Builds the complete application router: public routes, token-protected
/// admin routes, CORS, and the Swagger UI.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/health", get(global_health_handler))
        .route("/api/user/submit-review", post(user::submit_review_handler))
        .route("/api/user/health", get(user::user_health_handler))
        .route("/api/admin/login", post(admin::login_handler))
        .route("/api/admin/health", get(admin::admin_health_handler));

    // Protected routes (bearer token required)
    let protected_routes = Router::new()
        .route("/api/admin/logout", post(admin::logout_handler))
        .route("/api/admin/reviews", get(admin::list_reviews_handler))
        .route("/api/admin/analytics", get(admin::analytics_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .with_state(state);

    // Merge the API router with the Swagger UI router for a complete application.
    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
}
