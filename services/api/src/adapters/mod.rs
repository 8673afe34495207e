pub mod review_llm;
pub mod sessions;
pub mod store;

pub use review_llm::OpenAiReviewAnalyzer;
pub use sessions::InMemorySessionStore;
pub use store::MongoReviewStore;
