//! crates/feedback_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use crate::domain::{
    AdminSession, AnalyticsSnapshot, NewReview, ReviewAnalysis, ReviewPage, ReviewQuery,
    StoredReview,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Produces the three analysis artifacts for a submitted review.
///
/// Implementations never fail: when the backing model is unreachable or
/// returns garbage, they substitute deterministic fallback content and mark
/// the result with `model_used == "fallback"`.
#[async_trait]
pub trait ReviewAnalysisService: Send + Sync {
    async fn analyze(&self, rating: i32, review_text: &str) -> ReviewAnalysis;
}

/// Persistence for reviews and the aggregates computed over them.
#[async_trait]
pub trait ReviewStoreService: Send + Sync {
    /// Stamps the submission time and inserts the review, returning its new id.
    async fn save_review(&self, review: NewReview) -> PortResult<String>;

    /// One filtered, sorted page of reviews plus the total match count.
    async fn list_reviews(&self, query: ReviewQuery) -> PortResult<ReviewPage>;

    /// Dashboard aggregates over the entire collection.
    async fn analytics(&self) -> PortResult<AnalyticsSnapshot>;

    /// Single review lookup. A malformed or unknown id yields `Ok(None)`.
    async fn get_review(&self, id: &str) -> PortResult<Option<StoredReview>>;
}

/// Issues and checks the bearer tokens behind the admin dashboard.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Mints a fresh session with the configured lifetime.
    async fn create(&self) -> PortResult<AdminSession>;

    /// Ok when the token exists and has not expired. Expired tokens are
    /// evicted on sight and reported as `Unauthorized`.
    async fn validate(&self, token: &str) -> PortResult<()>;

    /// Removes the session. Revoking an unknown token is not an error.
    async fn revoke(&self, token: &str) -> PortResult<()>;

    /// Live (non-expired) session count, for the admin health report.
    async fn active_count(&self) -> usize;
}
