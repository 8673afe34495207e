//! crates/feedback_core/src/fallback.rs
//!
//! Local replacement content used when the external model call fails.
//! Everything in here is synchronous and infallible so the submission
//! pipeline can always finish with something sensible to store.

use crate::domain::ReviewAnalysis;

/// Sentinel recorded in `llm_model` when analysis fell back to local content.
pub const FALLBACK_MODEL: &str = "fallback";

/// The 1-5 rating collapsed into the three bands used to pick templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingTier {
    Positive,
    Neutral,
    Negative,
}

impl RatingTier {
    pub fn from_rating(rating: i32) -> Self {
        if rating >= 4 {
            RatingTier::Positive
        } else if rating == 3 {
            RatingTier::Neutral
        } else {
            RatingTier::Negative
        }
    }
}

/// Canned thank-you reply keyed by exact rating. Ratings outside 1-5 get the
/// neutral rating-3 entry.
pub fn fallback_reply(rating: i32) -> &'static str {
    match rating {
        5 => "Thank you for your excellent review! We're thrilled that you had such a wonderful experience with us. Your kind words mean a lot to our team!",
        4 => "Thank you for your positive feedback! We're glad you enjoyed your experience. We're always working to make things even better!",
        2 => "We're sorry your experience didn't meet your expectations. Thank you for letting us know - your feedback helps us improve.",
        1 => "We sincerely apologize for your disappointing experience. We take your feedback very seriously and will work hard to address these issues.",
        _ => "Thank you for your honest review. We appreciate your feedback and are always looking for ways to improve your experience.",
    }
}

/// Placeholder admin summary carrying the only facts we still know.
pub fn fallback_summary(rating: i32, review_text: &str) -> String {
    format!(
        "[Processing failed] Rating: {}/5. Review length: {} chars.",
        rating,
        review_text.chars().count()
    )
}

/// Canned action list by rating tier.
pub fn fallback_actions(rating: i32) -> &'static str {
    match RatingTier::from_rating(rating) {
        RatingTier::Positive => {
            "\u{2022} Maintain current service standards\n\u{2022} Consider featuring positive feedback\n\u{2022} Thank the customer"
        }
        RatingTier::Neutral => {
            "\u{2022} Review feedback for improvement areas\n\u{2022} Follow up if specific issues mentioned\n\u{2022} Monitor for patterns"
        }
        RatingTier::Negative => {
            "\u{2022} Prioritize addressing customer concerns\n\u{2022} Consider direct outreach to customer\n\u{2022} Review processes for improvement"
        }
    }
}

impl ReviewAnalysis {
    /// Complete local analysis for when the external call failed outright.
    pub fn fallback(rating: i32, review_text: &str) -> Self {
        ReviewAnalysis {
            user_response: fallback_reply(rating).to_string(),
            admin_summary: fallback_summary(rating, review_text),
            recommended_actions: fallback_actions(rating).to_string(),
            model_used: FALLBACK_MODEL.to_string(),
        }
    }
}
