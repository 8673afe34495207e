//! services/api/src/adapters/store.rs
//!
//! This module contains the review store adapter, which is the concrete
//! implementation of the `ReviewStoreService` port from the `core` crate.
//! It handles all interactions with MongoDB through the official driver.

use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Bson, Document},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};

use feedback_core::domain::{
    day_start_utc, page_has_more, rating_average, week_start_utc, zeroed_distribution,
    AnalyticsSnapshot, NewReview, ReviewMetadata, ReviewPage, ReviewQuery, ReviewSortField,
    ReviewStatus, SortOrder, StoredReview,
};
use feedback_core::ports::{PortError, PortResult, ReviewStoreService};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A MongoDB-backed adapter that implements the `ReviewStoreService` port.
#[derive(Clone)]
pub struct MongoReviewStore {
    reviews: Collection<ReviewRecord>,
}

impl MongoReviewStore {
    /// Creates a new `MongoReviewStore` over the `reviews` collection.
    pub fn new(db: &Database) -> Self {
        Self {
            reviews: db.collection::<ReviewRecord>("reviews"),
        }
    }

    /// A helper function to create the collection's indexes at startup.
    pub async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "metadata.submission_time": -1 })
                .options(
                    IndexOptions::builder()
                        .name("submission_time_desc".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "rating": 1 })
                .options(IndexOptions::builder().name("rating_filter".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "metadata.status": 1, "metadata.submission_time": -1 })
                .options(
                    IndexOptions::builder()
                        .name("status_time_compound".to_string())
                        .build(),
                )
                .build(),
        ];
        for index in indexes {
            self.reviews.create_index(index).await?;
        }
        tracing::info!("review collection indexes created");
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(Debug, Serialize, Deserialize)]
struct ReviewRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    rating: i32,
    review_text: String,
    user_response: String,
    admin_summary: String,
    recommended_actions: String,
    metadata: ReviewMetadataRecord,
}

#[derive(Debug, Serialize, Deserialize)]
struct ReviewMetadataRecord {
    submission_time: bson::DateTime,
    processing_time_ms: i64,
    llm_model: String,
    status: ReviewStatus,
}

impl ReviewRecord {
    fn from_new(review: NewReview, submission_time: chrono::DateTime<Utc>) -> Self {
        ReviewRecord {
            id: None,
            rating: review.rating,
            review_text: review.review_text,
            user_response: review.user_response,
            admin_summary: review.admin_summary,
            recommended_actions: review.recommended_actions,
            metadata: ReviewMetadataRecord {
                submission_time: bson::DateTime::from_chrono(submission_time),
                processing_time_ms: review.processing_time_ms,
                llm_model: review.llm_model,
                status: review.status,
            },
        }
    }

    fn to_domain(self) -> StoredReview {
        StoredReview {
            id: self.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            rating: self.rating,
            review_text: self.review_text,
            user_response: self.user_response,
            admin_summary: self.admin_summary,
            recommended_actions: self.recommended_actions,
            metadata: ReviewMetadata {
                submission_time: self.metadata.submission_time.to_chrono(),
                processing_time_ms: self.metadata.processing_time_ms,
                llm_model: self.metadata.llm_model,
                status: self.metadata.status,
            },
        }
    }
}

//=========================================================================================
// Query Document Builders
//=========================================================================================

/// Builds the match filter for listing and counting. The search string is
/// escaped so it matches as a literal, case-insensitive substring.
fn filter_document(rating: Option<i32>, search: Option<&str>) -> Document {
    let mut filter = Document::new();
    if let Some(rating) = rating {
        filter.insert("rating", rating);
    }
    if let Some(search) = search {
        if !search.is_empty() {
            filter.insert(
                "review_text",
                doc! { "$regex": regex::escape(search), "$options": "i" },
            );
        }
    }
    filter
}

/// Maps the logical sort key onto the stored document path.
fn sort_document(field: ReviewSortField, order: SortOrder) -> Document {
    let key = match field {
        ReviewSortField::SubmissionTime => "metadata.submission_time",
        ReviewSortField::Rating => "rating",
        ReviewSortField::Status => "metadata.status",
    };
    let direction = match order {
        SortOrder::Desc => -1,
        SortOrder::Asc => 1,
    };
    let mut sort = Document::new();
    sort.insert(key, direction);
    sort
}

/// Integer extraction across the BSON numeric types the aggregation can emit.
fn bson_int(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(v) => Some(*v as i64),
        Bson::Int64(v) => Some(*v),
        _ => None,
    }
}

//=========================================================================================
// `ReviewStoreService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ReviewStoreService for MongoReviewStore {
    async fn save_review(&self, review: NewReview) -> PortResult<String> {
        let record = ReviewRecord::from_new(review, Utc::now());
        let result = self
            .reviews
            .insert_one(record)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            PortError::Unexpected("insert did not return an ObjectId".to_string())
        })?;

        tracing::info!(review_id = %id.to_hex(), "review saved");
        Ok(id.to_hex())
    }

    async fn list_reviews(&self, query: ReviewQuery) -> PortResult<ReviewPage> {
        let filter = filter_document(query.rating, query.search.as_deref());

        // Total reflects the filtered set, independent of the page window.
        let total_count = self
            .reviews
            .count_documents(filter.clone())
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let skip = query.skip();
        let records: Vec<ReviewRecord> = self
            .reviews
            .find(filter)
            .sort(sort_document(query.sort_field, query.sort_order))
            .skip(skip)
            .limit(query.page_size as i64)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let reviews: Vec<StoredReview> =
            records.into_iter().map(ReviewRecord::to_domain).collect();
        let has_more = page_has_more(skip, reviews.len(), total_count);

        Ok(ReviewPage {
            reviews,
            total_count,
            has_more,
        })
    }

    async fn analytics(&self) -> PortResult<AnalyticsSnapshot> {
        let total_reviews = self
            .reviews
            .count_documents(Document::new())
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let pipeline = vec![doc! { "$group": { "_id": "$rating", "count": { "$sum": 1 } } }];
        let mut cursor = self
            .reviews
            .aggregate(pipeline)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let mut rating_distribution = zeroed_distribution();
        let mut rating_sum: i64 = 0;
        while let Some(group) = cursor
            .try_next()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?
        {
            let rating = group.get("_id").and_then(bson_int);
            let count = group.get("count").and_then(bson_int);
            if let (Some(rating), Some(count)) = (rating, count) {
                if let Some(bucket) = u8::try_from(rating)
                    .ok()
                    .and_then(|r| rating_distribution.get_mut(&r))
                {
                    *bucket = count as u64;
                }
                rating_sum += rating * count;
            }
        }

        let now = Utc::now();
        let reviews_today = self
            .reviews
            .count_documents(doc! {
                "metadata.submission_time": { "$gte": bson::DateTime::from_chrono(day_start_utc(now)) }
            })
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let reviews_this_week = self
            .reviews
            .count_documents(doc! {
                "metadata.submission_time": { "$gte": bson::DateTime::from_chrono(week_start_utc(now)) }
            })
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(AnalyticsSnapshot {
            total_reviews,
            average_rating: rating_average(rating_sum, total_reviews),
            rating_distribution,
            reviews_today,
            reviews_this_week,
        })
    }

    async fn get_review(&self, id: &str) -> PortResult<Option<StoredReview>> {
        // A malformed id can never match a document, so it is not-found.
        let object_id = match ObjectId::parse_str(id) {
            Ok(oid) => oid,
            Err(_) => return Ok(None),
        };

        let record = self
            .reviews
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(record.map(ReviewRecord::to_domain))
    }
}
