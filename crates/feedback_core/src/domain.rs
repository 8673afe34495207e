//! crates/feedback_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or HTTP framework.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Processing outcome stored with every review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Processed,
    Failed,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Processed => "processed",
            ReviewStatus::Failed => "failed",
        }
    }
}

/// The three artifacts produced for one review, plus the model that made them.
///
/// `model_used` is the configured model identifier, or the literal `"fallback"`
/// when the external call failed and local fallback content was substituted.
#[derive(Debug, Clone)]
pub struct ReviewAnalysis {
    pub user_response: String,
    pub admin_summary: String,
    pub recommended_actions: String,
    pub model_used: String,
}

/// A review ready to be persisted. `submission_time` is stamped by the store
/// at insert, not by the caller.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub rating: i32,
    pub review_text: String,
    pub user_response: String,
    pub admin_summary: String,
    pub recommended_actions: String,
    pub processing_time_ms: i64,
    pub llm_model: String,
    pub status: ReviewStatus,
}

/// A review as read back from the store, identity included.
#[derive(Debug, Clone)]
pub struct StoredReview {
    pub id: String,
    pub rating: i32,
    pub review_text: String,
    pub user_response: String,
    pub admin_summary: String,
    pub recommended_actions: String,
    pub metadata: ReviewMetadata,
}

#[derive(Debug, Clone)]
pub struct ReviewMetadata {
    pub submission_time: DateTime<Utc>,
    pub processing_time_ms: i64,
    pub llm_model: String,
    pub status: ReviewStatus,
}

/// Logical sort keys for the review listing. Unrecognized input falls back to
/// submission time so a bad query string never becomes an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewSortField {
    SubmissionTime,
    Rating,
    Status,
}

impl ReviewSortField {
    pub fn parse(value: &str) -> Self {
        match value {
            "rating" => ReviewSortField::Rating,
            "status" => ReviewSortField::Status,
            _ => ReviewSortField::SubmissionTime,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Only the literal `desc` sorts descending; anything else is ascending.
    pub fn parse(value: &str) -> Self {
        if value == "desc" {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

/// Parameters for one page of the review listing. `page` is 1-based.
#[derive(Debug, Clone)]
pub struct ReviewQuery {
    pub page: u32,
    pub page_size: u32,
    pub rating: Option<i32>,
    pub search: Option<String>,
    pub sort_field: ReviewSortField,
    pub sort_order: SortOrder,
}

impl ReviewQuery {
    /// Number of documents skipped before this page starts. A stray
    /// `page = 0` is treated as the first page rather than underflowing.
    pub fn skip(&self) -> u64 {
        (self.page as u64).saturating_sub(1) * self.page_size as u64
    }
}

#[derive(Debug, Clone)]
pub struct ReviewPage {
    pub reviews: Vec<StoredReview>,
    pub total_count: u64,
    pub has_more: bool,
}

/// Aggregated dashboard metrics over the whole collection.
#[derive(Debug, Clone)]
pub struct AnalyticsSnapshot {
    pub total_reviews: u64,
    pub average_rating: f64,
    pub rating_distribution: BTreeMap<u8, u64>,
    pub reviews_today: u64,
    pub reviews_this_week: u64,
}

/// An empty distribution with all five buckets present and zeroed.
pub fn zeroed_distribution() -> BTreeMap<u8, u64> {
    (1..=5u8).map(|rating| (rating, 0)).collect()
}

/// Count-weighted mean rating rounded to two decimals; 0.0 for an empty set.
pub fn rating_average(rating_sum: i64, total_reviews: u64) -> f64 {
    if total_reviews == 0 {
        return 0.0;
    }
    let raw = rating_sum as f64 / total_reviews as f64;
    (raw * 100.0).round() / 100.0
}

/// Whether more pages follow the one just fetched.
pub fn page_has_more(skip: u64, returned: usize, total_count: u64) -> bool {
    skip + (returned as u64) < total_count
}

/// Midnight of the current UTC day.
pub fn day_start_utc(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Midnight of the most recent Monday (ISO week start).
pub fn week_start_utc(now: DateTime<Utc>) -> DateTime<Utc> {
    let days_into_week = now.date_naive().weekday().num_days_from_monday();
    day_start_utc(now) - Duration::days(days_into_week as i64)
}

/// An admin bearer session held in process memory.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
