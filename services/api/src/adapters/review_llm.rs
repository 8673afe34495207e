//! services/api/src/adapters/review_llm.rs
//!
//! This module contains the adapter for the review-analysis LLM.
//! It implements the `ReviewAnalysisService` port from the `core` crate with a
//! single structured-output chat call; any failure on that path is absorbed
//! into the local fallback tables so callers always get usable content.

const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are an AI assistant that analyzes customer reviews and generates three distinct outputs: an internal business summary, actionable recommendations, and a customer-facing response.

Respond with a single JSON object containing exactly these three string fields:

"admin_summary" - You are an internal business analyst summarizing customer feedback for management review. Write a concise internal summary (1-2 sentences, under 50 words) capturing overall sentiment, key points or specific issues raised, and main areas of praise or concern. Use professional, objective language and note any urgent issues.

"recommended_actions" - You are a business operations advisor. Provide 2-3 specific, actionable recommendations as bullet points, each starting with "• " and an action verb, each under 15 words. For positive reviews (4-5 stars) focus on what to maintain and how to leverage the feedback; for neutral reviews (3 stars) on improvement opportunities and follow-up; for negative reviews (1-2 stars) on urgent fixes and customer recovery.

"user_response" - You are a friendly and professional customer service representative. Write a warm, personalized response (2-3 sentences, 40-80 words) matched to the rating: enthusiastic gratitude for 5 stars, warm thanks plus commitment to improve for 4, honest appreciation and interest in improving for 3, a sincere apology and commitment for 2, and a genuine apology with a promise to address the problems for 1. Reference specific details from the review, never be defensive, and end on a forward-looking note.

Output only the JSON object, no other text."#;

const ANALYSIS_USER_TEMPLATE: &str = r#"CUSTOMER REVIEW:
- Rating: {rating}/5 stars
- Review: "{review_text}"

Generate the JSON object with appropriate content for a {rating}-star review."#;

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use feedback_core::{
    domain::ReviewAnalysis,
    ports::{PortError, PortResult, ReviewAnalysisService},
};
use serde::Deserialize;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ReviewAnalysisService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiReviewAnalyzer {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

/// The JSON shape the model is asked to return.
#[derive(Debug, Deserialize)]
struct AnalysisPayload {
    user_response: String,
    admin_summary: String,
    recommended_actions: String,
}

impl OpenAiReviewAnalyzer {
    /// Creates a new `OpenAiReviewAnalyzer`.
    pub fn new(client: Client<OpenAIConfig>, model: String, timeout: Duration) -> Self {
        Self {
            client,
            model,
            timeout,
        }
    }

    /// One bounded chat-completion call returning the parsed three-field payload.
    /// Every failure mode (build, transport, timeout, empty choice, bad JSON)
    /// surfaces as a `PortError` for the caller to convert into fallback content.
    async fn request_analysis(&self, rating: i32, review_text: &str) -> PortResult<AnalysisPayload> {
        let user_input = ANALYSIS_USER_TEMPLATE
            .replace("{rating}", &rating.to_string())
            .replace("{review_text}", review_text);

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(ANALYSIS_SYSTEM_PROMPT)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_input)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
            .temperature(0.7)
            .max_tokens(600u32)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Bound the whole network exchange; a slow provider is a failed provider.
        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| {
                PortError::Unexpected(format!(
                    "analysis call exceeded the {}s timeout",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected(
                    "Analysis LLM response contained no text content.".to_string(),
                )
            })?;

        parse_analysis(&content).ok_or_else(|| {
            PortError::Unexpected(
                "Analysis LLM output did not match the expected JSON shape.".to_string(),
            )
        })
    }
}

/// Parses the model output into the expected payload.
///
/// Tries the raw string first, then the substring between the outermost
/// braces for models that wrap JSON in prose or code fences. All three
/// fields must be present and non-blank.
fn parse_analysis(raw: &str) -> Option<AnalysisPayload> {
    let payload: AnalysisPayload = serde_json::from_str(raw).ok().or_else(|| {
        let start = raw.find('{')?;
        let end = raw.rfind('}')?;
        serde_json::from_str(&raw[start..=end]).ok()
    })?;

    if payload.user_response.trim().is_empty()
        || payload.admin_summary.trim().is_empty()
        || payload.recommended_actions.trim().is_empty()
    {
        return None;
    }

    Some(AnalysisPayload {
        user_response: payload.user_response.trim().to_string(),
        admin_summary: payload.admin_summary.trim().to_string(),
        recommended_actions: payload.recommended_actions.trim().to_string(),
    })
}

//=========================================================================================
// `ReviewAnalysisService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ReviewAnalysisService for OpenAiReviewAnalyzer {
    /// Produces the three analysis artifacts for a review. Never fails: any
    /// problem with the external call is logged and replaced by the static
    /// fallback content, marked with `model_used == "fallback"`.
    async fn analyze(&self, rating: i32, review_text: &str) -> ReviewAnalysis {
        match self.request_analysis(rating, review_text).await {
            Ok(payload) => ReviewAnalysis {
                user_response: payload.user_response,
                admin_summary: payload.admin_summary,
                recommended_actions: payload.recommended_actions,
                model_used: self.model.clone(),
            },
            Err(error) => {
                tracing::warn!(%error, rating, "review analysis failed, using fallback content");
                ReviewAnalysis::fallback(rating, review_text)
            }
        }
    }
}
