//! User-Story Generator
//!
//! Turns an existing requirement set into user stories. Stateless given its
//! input; rejects an empty requirement set before contacting the provider.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use requora_llm::{ChatMessage, InferenceProvider};

use crate::models::ExtractedRequirement;
use crate::services::prompts;
use crate::utils::error::{AppError, AppResult};
use crate::utils::json::extract_json_from_response;

/// One generated user story
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStory {
    pub title: String,
    pub description: String,
    pub acceptance_criteria: Vec<String>,
    /// Fibonacci-style estimate, 1-13
    pub story_points: u8,
    /// 1-5
    pub priority: u8,
    /// 1-5
    pub business_value: u8,
}

/// Generates user stories from a requirement set
pub struct StoryGenerator {
    provider: Arc<dyn InferenceProvider>,
}

impl StoryGenerator {
    /// Create a new generator backed by the given provider
    pub fn new(provider: Arc<dyn InferenceProvider>) -> Self {
        Self { provider }
    }

    /// Generate user stories for the given requirements.
    ///
    /// An empty requirement set is a precondition failure; the provider is
    /// never contacted in that case.
    pub async fn generate(
        &self,
        requirements: &[ExtractedRequirement],
    ) -> AppResult<Vec<UserStory>> {
        if requirements.is_empty() {
            return Err(AppError::precondition(
                "no requirements to generate user stories from; run aggregation first",
            ));
        }

        let payload = format!(
            "Requirements: {}",
            serde_json::to_string_pretty(requirements)?
        );

        let response = self
            .provider
            .complete(
                vec![ChatMessage::user(payload)],
                Some(prompts::USER_STORIES.to_string()),
            )
            .await?;

        let raw = response.text()?;
        let json = extract_json_from_response(raw);

        let parsed: UserStoriesResponse = serde_json::from_str(&json).map_err(|e| {
            AppError::schema_violation(format!("user stories did not match contract: {}", e))
        })?;

        debug!(stories = parsed.user_stories.len(), "user stories generated");

        Ok(parsed.user_stories)
    }
}

/// Wire shape of the user-story contract
#[derive(Debug, Deserialize)]
struct UserStoriesResponse {
    user_stories: Vec<UserStory>,
}
