//! services/api/src/web/user.rs
//!
//! Contains the Axum handlers for the user-facing endpoints: review
//! submission and the user API health check.

use axum::{extract::State, response::Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use utoipa::ToSchema;

use feedback_core::domain::{NewReview, ReviewStatus};
use feedback_core::fallback::FALLBACK_MODEL;
use feedback_core::validation::{sanitize_review_text, validate_rating, validate_review_text};

use crate::web::error::WebError;
use crate::web::extract::ApiJson;
use crate::web::state::AppState;

//=========================================================================================
// API Request/Response Structs
//=========================================================================================

/// A user review submission.
#[derive(Deserialize, ToSchema)]
pub struct SubmitReviewRequest {
    /// Star rating from 1 to 5.
    pub rating: i32,
    /// Review text (10-1000 characters after trimming).
    pub review_text: String,
}

/// The response payload sent after a review is accepted.
#[derive(Serialize, ToSchema)]
pub struct SubmitReviewResponse {
    pub success: bool,
    pub message: String,
    pub user_response: String,
    pub submission_id: String,
    pub processing_time_ms: i64,
}

#[derive(Serialize, ToSchema)]
pub struct UserHealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// Submit a new review and receive the AI-generated reply.
///
/// The submission is validated, analyzed, and persisted in that order. A
/// failed analysis still produces a successful submission: the stored
/// document carries fallback content and `status: failed` so admins can see
/// what happened, while the submitter only sees their reply.
#[utoipa::path(
    post,
    path = "/api/user/submit-review",
    request_body = SubmitReviewRequest,
    responses(
        (status = 200, description = "Review accepted", body = SubmitReviewResponse),
        (status = 400, description = "Validation error", body = crate::web::error::ErrorBody),
        (status = 500, description = "Review could not be stored", body = crate::web::error::ErrorBody)
    ),
    tag = "User"
)]
pub async fn submit_review_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<SubmitReviewRequest>,
) -> Result<Json<SubmitReviewResponse>, WebError> {
    let start = Instant::now();

    // 1. Validate the rating and the sanitized text
    validate_rating(request.rating).map_err(|e| WebError::Validation(e.to_string()))?;
    let review_text = sanitize_review_text(&request.review_text);
    validate_review_text(&review_text).map_err(|e| WebError::Validation(e.to_string()))?;

    info!(
        rating = request.rating,
        text_length = review_text.chars().count(),
        "received review submission"
    );

    // 2. Analyze (never fails; falls back internally)
    let analysis = state.analyzer.analyze(request.rating, &review_text).await;
    let processing_time_ms = start.elapsed().as_millis() as i64;
    let status = if analysis.model_used == FALLBACK_MODEL {
        ReviewStatus::Failed
    } else {
        ReviewStatus::Processed
    };

    // 3. Persist; storage is the only failure the submitter can see
    let submission_id = state
        .store
        .save_review(NewReview {
            rating: request.rating,
            review_text,
            user_response: analysis.user_response.clone(),
            admin_summary: analysis.admin_summary,
            recommended_actions: analysis.recommended_actions,
            processing_time_ms,
            llm_model: analysis.model_used,
            status,
        })
        .await
        .map_err(|e| {
            error!("Failed to save review: {:?}", e);
            WebError::Internal("Unable to process your review. Please try again later.".to_string())
        })?;

    info!(%submission_id, "review saved successfully");

    Ok(Json(SubmitReviewResponse {
        success: true,
        message: "Review submitted successfully! Thank you for your feedback.".to_string(),
        user_response: analysis.user_response,
        submission_id,
        processing_time_ms,
    }))
}

/// Health check for the user API.
#[utoipa::path(
    get,
    path = "/api/user/health",
    responses((status = 200, description = "Service is healthy", body = UserHealthResponse)),
    tag = "User"
)]
pub async fn user_health_handler() -> Json<UserHealthResponse> {
    Json(UserHealthResponse {
        status: "healthy".to_string(),
        service: "user-api".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
