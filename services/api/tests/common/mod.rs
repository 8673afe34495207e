//! Shared fixtures for the router-level integration tests: in-memory mock
//! implementations of the store and analyzer ports, plus helpers to build a
//! test `AppState` and decode response bodies.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use chrono::{DateTime, Utc};
use serde_json::Value;

use api_lib::adapters::InMemorySessionStore;
use api_lib::config::Config;
use api_lib::web::{build_router, AppState};
use feedback_core::domain::{
    day_start_utc, page_has_more, rating_average, week_start_utc, zeroed_distribution,
    AnalyticsSnapshot, NewReview, ReviewAnalysis, ReviewMetadata, ReviewPage, ReviewQuery,
    ReviewSortField, ReviewStatus, SortOrder, StoredReview,
};
use feedback_core::ports::{
    PortError, PortResult, ReviewAnalysisService, ReviewStoreService, SessionStore,
};

pub const TEST_ADMIN_PASSWORD: &str = "test-password";

pub fn test_config() -> Arc<Config> {
    Arc::new(Config {
        bind_address: "127.0.0.1:0".parse::<SocketAddr>().unwrap(),
        mongodb_uri: "mongodb://localhost:27017".to_string(),
        mongodb_db_name: "feedback_test".to_string(),
        log_level: tracing::Level::INFO,
        openai_api_key: String::new(),
        llm_model: "gpt-4o-mini".to_string(),
        llm_timeout: StdDuration::from_secs(5),
        admin_password: TEST_ADMIN_PASSWORD.to_string(),
        session_expire_hours: 24,
        cors_origins: vec!["http://localhost:8000".to_string()],
    })
}

//=========================================================================================
// Mock Analyzer
//=========================================================================================

/// Analyzer double that either echoes canned content under a fixed model name
/// or takes the real fallback path, and counts how often it was invoked.
pub struct MockAnalyzer {
    pub model: String,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl MockAnalyzer {
    pub fn succeeding() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReviewAnalysisService for MockAnalyzer {
    async fn analyze(&self, rating: i32, review_text: &str) -> ReviewAnalysis {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            ReviewAnalysis::fallback(rating, review_text)
        } else {
            ReviewAnalysis {
                user_response: format!("Thank you for your {rating}-star review!"),
                admin_summary: "Customer left feedback.".to_string(),
                recommended_actions: "\u{2022} Keep it up".to_string(),
                model_used: self.model.clone(),
            }
        }
    }
}

//=========================================================================================
// Mock Review Store
//=========================================================================================

/// In-memory stand-in for the Mongo adapter with the same filter, sort,
/// pagination, and aggregation semantics.
#[derive(Default)]
pub struct MockReviewStore {
    reviews: Mutex<Vec<StoredReview>>,
    next_id: AtomicUsize,
}

impl MockReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint_id(&self) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        format!("{:024x}", n + 1)
    }

    /// Inserts a pre-built review directly, bypassing the port.
    pub fn seed(&self, rating: i32, review_text: &str, submission_time: DateTime<Utc>) -> String {
        let id = self.mint_id();
        self.reviews.lock().unwrap().push(StoredReview {
            id: id.clone(),
            rating,
            review_text: review_text.to_string(),
            user_response: "Thanks!".to_string(),
            admin_summary: "Seeded.".to_string(),
            recommended_actions: "\u{2022} None".to_string(),
            metadata: ReviewMetadata {
                submission_time,
                processing_time_ms: 10,
                llm_model: "gpt-4o-mini".to_string(),
                status: ReviewStatus::Processed,
            },
        });
        id
    }

    pub fn stored_reviews(&self) -> Vec<StoredReview> {
        self.reviews.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.reviews.lock().unwrap().len()
    }
}

#[async_trait]
impl ReviewStoreService for MockReviewStore {
    async fn save_review(&self, review: NewReview) -> PortResult<String> {
        let id = self.mint_id();
        self.reviews.lock().unwrap().push(StoredReview {
            id: id.clone(),
            rating: review.rating,
            review_text: review.review_text,
            user_response: review.user_response,
            admin_summary: review.admin_summary,
            recommended_actions: review.recommended_actions,
            metadata: ReviewMetadata {
                submission_time: Utc::now(),
                processing_time_ms: review.processing_time_ms,
                llm_model: review.llm_model,
                status: review.status,
            },
        });
        Ok(id)
    }

    async fn list_reviews(&self, query: ReviewQuery) -> PortResult<ReviewPage> {
        let reviews = self.reviews.lock().unwrap();
        let mut matched: Vec<StoredReview> = reviews
            .iter()
            .filter(|r| query.rating.is_none_or(|rating| r.rating == rating))
            .filter(|r| {
                query.search.as_deref().is_none_or(|search| {
                    search.is_empty()
                        || r.review_text.to_lowercase().contains(&search.to_lowercase())
                })
            })
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            let ordering = match query.sort_field {
                ReviewSortField::SubmissionTime => a
                    .metadata
                    .submission_time
                    .cmp(&b.metadata.submission_time),
                ReviewSortField::Rating => a.rating.cmp(&b.rating),
                ReviewSortField::Status => a
                    .metadata
                    .status
                    .as_str()
                    .cmp(b.metadata.status.as_str()),
            };
            match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total_count = matched.len() as u64;
        let skip = query.skip();
        let page: Vec<StoredReview> = matched
            .into_iter()
            .skip(skip as usize)
            .take(query.page_size as usize)
            .collect();
        let has_more = page_has_more(skip, page.len(), total_count);

        Ok(ReviewPage {
            reviews: page,
            total_count,
            has_more,
        })
    }

    async fn analytics(&self) -> PortResult<AnalyticsSnapshot> {
        let reviews = self.reviews.lock().unwrap();
        let total_reviews = reviews.len() as u64;

        let mut rating_distribution = zeroed_distribution();
        let mut rating_sum: i64 = 0;
        for review in reviews.iter() {
            if let Some(bucket) = u8::try_from(review.rating)
                .ok()
                .and_then(|r| rating_distribution.get_mut(&r))
            {
                *bucket += 1;
            }
            rating_sum += review.rating as i64;
        }

        let now = Utc::now();
        let reviews_today = reviews
            .iter()
            .filter(|r| r.metadata.submission_time >= day_start_utc(now))
            .count() as u64;
        let reviews_this_week = reviews
            .iter()
            .filter(|r| r.metadata.submission_time >= week_start_utc(now))
            .count() as u64;

        Ok(AnalyticsSnapshot {
            total_reviews,
            average_rating: rating_average(rating_sum, total_reviews),
            rating_distribution,
            reviews_today,
            reviews_this_week,
        })
    }

    async fn get_review(&self, id: &str) -> PortResult<Option<StoredReview>> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }
}

/// Store double whose every operation fails, for exercising the 500 paths.
pub struct FailingReviewStore;

#[async_trait]
impl ReviewStoreService for FailingReviewStore {
    async fn save_review(&self, _review: NewReview) -> PortResult<String> {
        Err(PortError::Unexpected("store unreachable".to_string()))
    }

    async fn list_reviews(&self, _query: ReviewQuery) -> PortResult<ReviewPage> {
        Err(PortError::Unexpected("store unreachable".to_string()))
    }

    async fn analytics(&self) -> PortResult<AnalyticsSnapshot> {
        Err(PortError::Unexpected("store unreachable".to_string()))
    }

    async fn get_review(&self, _id: &str) -> PortResult<Option<StoredReview>> {
        Err(PortError::Unexpected("store unreachable".to_string()))
    }
}

//=========================================================================================
// Router and Request Helpers
//=========================================================================================

/// Everything a test needs to drive the router and inspect the doubles.
pub struct TestApp {
    pub router: axum::Router,
    pub sessions: Arc<InMemorySessionStore>,
}

pub fn build_test_app(
    store: Arc<dyn ReviewStoreService>,
    analyzer: Arc<dyn ReviewAnalysisService>,
) -> TestApp {
    let sessions = Arc::new(InMemorySessionStore::new(24));
    let state = Arc::new(AppState {
        store,
        analyzer,
        sessions: sessions.clone() as Arc<dyn SessionStore>,
        config: test_config(),
    });
    TestApp {
        router: build_router(state),
        sessions,
    }
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
