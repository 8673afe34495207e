//! crates/feedback_core/src/validation.rs
//!
//! Input hygiene for submitted reviews. Messages here are surfaced verbatim
//! to the caller as 400 responses, so their wording is part of the API.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Rating must be between 1 and 5")]
    RatingOutOfRange,
    #[error("Review must be at least 10 characters long")]
    TooShort,
    #[error("Review must not exceed 1000 characters")]
    TooLong,
    #[error("Please write a more detailed review")]
    LowVariety,
    #[error("Please avoid excessive word repetition")]
    Repetitive,
}

pub fn validate_rating(rating: i32) -> Result<(), ValidationError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(ValidationError::RatingOutOfRange)
    }
}

/// Strips NUL bytes, collapses whitespace runs (newlines included) to single
/// spaces, drops remaining C0 control characters and DEL, and trims the ends.
pub fn sanitize_review_text(text: &str) -> String {
    let collapsed = text
        .replace('\u{0}', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    collapsed
        .chars()
        .filter(|&c| c as u32 >= 32 && c as u32 != 127)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Quality gate over the sanitized text. Length bounds count characters, not
/// bytes. The variety check counts distinct lowercased characters; the
/// repetition check only applies past three words.
pub fn validate_review_text(text: &str) -> Result<(), ValidationError> {
    let trimmed = text.trim();
    let char_count = trimmed.chars().count();

    if char_count < 10 {
        return Err(ValidationError::TooShort);
    }
    if char_count > 1000 {
        return Err(ValidationError::TooLong);
    }

    let distinct_chars: std::collections::HashSet<char> =
        trimmed.to_lowercase().chars().collect();
    if distinct_chars.len() < 5 {
        return Err(ValidationError::LowVariety);
    }

    let words: Vec<&str> = trimmed.split_whitespace().collect();
    if words.len() > 3 {
        let unique_words: std::collections::HashSet<String> =
            words.iter().map(|w| w.to_lowercase()).collect();
        if (unique_words.len() as f64) < words.len() as f64 * 0.3 {
            return Err(ValidationError::Repetitive);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert_eq!(validate_rating(0), Err(ValidationError::RatingOutOfRange));
        assert_eq!(validate_rating(6), Err(ValidationError::RatingOutOfRange));
    }

    #[test]
    fn sanitize_collapses_whitespace_and_drops_controls() {
        assert_eq!(
            sanitize_review_text("  great\t\tstay,\n\nwould   return  "),
            "great stay, would return"
        );
        assert_eq!(sanitize_review_text("nul\u{0}byte"), "nulbyte");
        assert_eq!(sanitize_review_text("bell\u{7}s and\u{7f}del"), "bells anddel");
    }

    #[test]
    fn sanitize_keeps_non_ascii_text() {
        assert_eq!(sanitize_review_text("très bon séjour"), "très bon séjour");
    }

    #[test]
    fn length_bounds_count_characters() {
        assert_eq!(
            validate_review_text("short"),
            Err(ValidationError::TooShort)
        );
        // 9 chars of padding around trim.
        assert_eq!(
            validate_review_text("   abcdefghi   "),
            Err(ValidationError::TooShort)
        );
        let long = "ab ".repeat(400); // 1200 chars
        assert_eq!(validate_review_text(&long), Err(ValidationError::TooLong));
        assert!(validate_review_text("a perfectly fine review").is_ok());
    }

    #[test]
    fn low_character_variety_is_rejected() {
        // 12 chars but only 3 distinct.
        assert_eq!(
            validate_review_text("aaaabbbbcccc"),
            Err(ValidationError::LowVariety)
        );
    }

    #[test]
    fn heavy_word_repetition_is_rejected() {
        let spam = "great great great great great great great great great great";
        assert_eq!(
            validate_review_text(spam),
            Err(ValidationError::Repetitive)
        );
        // Three words or fewer never trip the repetition rule.
        assert!(
            validate_review_text("great great great").err()
                != Some(ValidationError::Repetitive)
        );
    }

    #[test]
    fn repetition_check_is_case_insensitive() {
        let spam = "Great great GREAT gReAt great great great great great great";
        assert_eq!(
            validate_review_text(spam),
            Err(ValidationError::Repetitive)
        );
    }
}
