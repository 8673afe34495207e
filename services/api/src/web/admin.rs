//! services/api/src/web/admin.rs
//!
//! Contains the Axum handlers for the admin dashboard: login/logout, the
//! paginated review listing, analytics, and the admin API health check.

use axum::{extract::State, response::Json, Extension};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::{IntoParams, ToSchema};

use feedback_core::domain::{ReviewQuery, ReviewSortField, SortOrder, StoredReview};

use crate::web::error::WebError;
use crate::web::extract::{ApiJson, ApiQuery};
use crate::web::middleware::AdminToken;
use crate::web::state::AppState;

//=========================================================================================
// API Request/Response Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Admin password.
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_hours: Option<i64>,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Query parameters accepted by the review listing.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListReviewsParams {
    /// Page number (starts from 1).
    pub page: Option<u32>,
    /// Items per page (max 100).
    pub page_size: Option<u32>,
    /// Filter by exact star rating.
    pub rating: Option<i32>,
    /// Case-insensitive substring match on the review text.
    pub search: Option<String>,
    /// Sort field: submission_time, rating, or status.
    pub sort_by: Option<String>,
    /// Sort order: asc or desc.
    pub sort_order: Option<String>,
}

/// One review as shown on the admin dashboard, metadata flattened.
#[derive(Serialize, ToSchema)]
pub struct ReviewItemResponse {
    pub id: String,
    pub rating: i32,
    pub review_text: String,
    pub user_response: String,
    pub admin_summary: String,
    pub recommended_actions: String,
    pub submission_time: DateTime<Utc>,
    pub status: String,
}

impl From<StoredReview> for ReviewItemResponse {
    fn from(review: StoredReview) -> Self {
        ReviewItemResponse {
            id: review.id,
            rating: review.rating,
            review_text: review.review_text,
            user_response: review.user_response,
            admin_summary: review.admin_summary,
            recommended_actions: review.recommended_actions,
            submission_time: review.metadata.submission_time,
            status: review.metadata.status.as_str().to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ReviewsListResponse {
    pub reviews: Vec<ReviewItemResponse>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
    pub has_more: bool,
}

#[derive(Serialize, ToSchema)]
pub struct AnalyticsResponse {
    pub total_reviews: u64,
    pub average_rating: f64,
    pub rating_distribution: BTreeMap<u8, u64>,
    pub reviews_today: u64,
    pub reviews_this_week: u64,
}

#[derive(Serialize, ToSchema)]
pub struct AdminHealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
    pub active_sessions: usize,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// Admin login. Mints a bearer token on a correct password.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::web::error::ErrorBody)
    ),
    tag = "Admin"
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, WebError> {
    if request.password != state.config.admin_password {
        warn!("failed admin login attempt");
        return Err(WebError::Unauthorized("Invalid password".to_string()));
    }

    let session = state.sessions.create().await.map_err(|e| {
        error!("Failed to create admin session: {:?}", e);
        WebError::Internal("Failed to create session".to_string())
    })?;

    info!("admin logged in successfully");

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token: Some(session.token),
        expires_in_hours: Some(state.config.session_expire_hours),
    }))
}

/// Admin logout. Revokes the presented token; already-gone tokens still
/// log out successfully.
#[utoipa::path(
    post,
    path = "/api/admin/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = crate::web::error::ErrorBody)
    ),
    security(("bearer_token" = [])),
    tag = "Admin"
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AdminToken>,
) -> Result<Json<MessageResponse>, WebError> {
    state.sessions.revoke(&token.0).await.map_err(|e| {
        error!("Failed to revoke admin session: {:?}", e);
        WebError::Internal("Failed to logout".to_string())
    })?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Logged out successfully".to_string(),
    }))
}

/// Paginated review listing with optional rating filter and text search.
#[utoipa::path(
    get,
    path = "/api/admin/reviews",
    params(ListReviewsParams),
    responses(
        (status = 200, description = "One page of reviews", body = ReviewsListResponse),
        (status = 400, description = "Invalid query parameter", body = crate::web::error::ErrorBody),
        (status = 401, description = "Missing or invalid token", body = crate::web::error::ErrorBody)
    ),
    security(("bearer_token" = [])),
    tag = "Admin"
)]
pub async fn list_reviews_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListReviewsParams>,
) -> Result<Json<ReviewsListResponse>, WebError> {
    let query = build_review_query(params)?;
    let (page, page_size) = (query.page, query.page_size);

    let result = state.store.list_reviews(query).await.map_err(|e| {
        error!("Error fetching reviews: {:?}", e);
        WebError::Internal("Failed to fetch reviews".to_string())
    })?;

    Ok(Json(ReviewsListResponse {
        reviews: result
            .reviews
            .into_iter()
            .map(ReviewItemResponse::from)
            .collect(),
        total_count: result.total_count,
        page,
        page_size,
        has_more: result.has_more,
    }))
}

/// Aggregated metrics for the admin dashboard.
#[utoipa::path(
    get,
    path = "/api/admin/analytics",
    responses(
        (status = 200, description = "Dashboard analytics", body = AnalyticsResponse),
        (status = 401, description = "Missing or invalid token", body = crate::web::error::ErrorBody)
    ),
    security(("bearer_token" = [])),
    tag = "Admin"
)]
pub async fn analytics_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AnalyticsResponse>, WebError> {
    let snapshot = state.store.analytics().await.map_err(|e| {
        error!("Error fetching analytics: {:?}", e);
        WebError::Internal("Failed to fetch analytics".to_string())
    })?;

    Ok(Json(AnalyticsResponse {
        total_reviews: snapshot.total_reviews,
        average_rating: snapshot.average_rating,
        rating_distribution: snapshot.rating_distribution,
        reviews_today: snapshot.reviews_today,
        reviews_this_week: snapshot.reviews_this_week,
    }))
}

/// Health check for the admin API, including the live session count.
#[utoipa::path(
    get,
    path = "/api/admin/health",
    responses((status = 200, description = "Service is healthy", body = AdminHealthResponse)),
    tag = "Admin"
)]
pub async fn admin_health_handler(State(state): State<Arc<AppState>>) -> Json<AdminHealthResponse> {
    Json(AdminHealthResponse {
        status: "healthy".to_string(),
        service: "admin-api".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        active_sessions: state.sessions.active_count().await,
    })
}

/// Range-checks the raw listing parameters and lowers them into a store query.
fn build_review_query(params: ListReviewsParams) -> Result<ReviewQuery, WebError> {
    let page = params.page.unwrap_or(1);
    if page < 1 {
        return Err(WebError::Validation("page must be at least 1".to_string()));
    }

    let page_size = params.page_size.unwrap_or(20);
    if !(1..=100).contains(&page_size) {
        return Err(WebError::Validation(
            "page_size must be between 1 and 100".to_string(),
        ));
    }

    if let Some(rating) = params.rating {
        if !(1..=5).contains(&rating) {
            return Err(WebError::Validation(
                "rating must be between 1 and 5".to_string(),
            ));
        }
    }

    Ok(ReviewQuery {
        page,
        page_size,
        rating: params.rating,
        search: params.search,
        sort_field: ReviewSortField::parse(params.sort_by.as_deref().unwrap_or("submission_time")),
        sort_order: SortOrder::parse(params.sort_order.as_deref().unwrap_or("desc")),
    })
}
