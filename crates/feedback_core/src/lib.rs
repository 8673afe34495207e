pub mod domain;
pub mod fallback;
pub mod ports;
pub mod validation;

pub use domain::{
    AdminSession, AnalyticsSnapshot, NewReview, ReviewAnalysis, ReviewMetadata, ReviewPage,
    ReviewQuery, ReviewSortField, ReviewStatus, SortOrder, StoredReview,
};
pub use fallback::FALLBACK_MODEL;
pub use ports::{PortError, PortResult, ReviewAnalysisService, ReviewStoreService, SessionStore};
pub use validation::ValidationError;
