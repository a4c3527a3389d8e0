//! Tool Recommender
//!
//! Chooses an automation tool for a requirement set, constrained to a fixed
//! candidate list. Stateless given its input; rejects an empty requirement
//! set before contacting the provider.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use requora_llm::{ChatMessage, InferenceProvider};

use crate::models::{Complexity, ExtractedRequirement};
use crate::services::prompts;
use crate::utils::error::{AppError, AppResult};
use crate::utils::json::extract_json_from_response;

/// The recommendation contract's result shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRecommendation {
    pub recommended_tool: String,
    pub reasoning: String,
    pub alternatives: Vec<String>,
    pub estimated_development_time: String,
    pub complexity: Complexity,
    pub roi_estimate: String,
}

/// Recommends an automation tool for a requirement set
pub struct ToolRecommender {
    provider: Arc<dyn InferenceProvider>,
    candidates: Vec<String>,
}

impl ToolRecommender {
    /// Create a recommender choosing among the given candidate tools
    pub fn new(provider: Arc<dyn InferenceProvider>, candidates: Vec<String>) -> Self {
        Self {
            provider,
            candidates,
        }
    }

    /// Recommend a tool for the given requirements.
    ///
    /// An empty requirement set is a precondition failure; the provider is
    /// never contacted in that case.
    pub async fn recommend(
        &self,
        requirements: &[ExtractedRequirement],
    ) -> AppResult<ToolRecommendation> {
        if requirements.is_empty() {
            return Err(AppError::precondition(
                "no requirements to recommend a tool for; run aggregation first",
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
                Some(prompts::tool_recommendation(&self.candidates)),
            )
            .await?;

        let raw = response.text()?;
        let json = extract_json_from_response(raw);

        let recommendation: ToolRecommendation = serde_json::from_str(&json).map_err(|e| {
            AppError::schema_violation(format!(
                "tool recommendation did not match contract: {}",
                e
            ))
        })?;

        debug!(tool = %recommendation.recommended_tool, "tool recommended");

        Ok(recommendation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RequirementKind;
    use crate::services::extraction::test_support::StubProvider;
    use uuid::Uuid;

    fn requirement() -> ExtractedRequirement {
        ExtractedRequirement::new(
            Uuid::new_v4(),
            RequirementKind::Process,
            "Scrape supplier portal nightly",
            serde_json::json!({}),
            75,
            2,
            Complexity::Medium,
        )
    }

    fn recommendation_json() -> String {
        serde_json::json!({
            "recommended_tool": "Playwright",
            "reasoning": "Browser automation against a portal without an API",
            "alternatives": ["Selenium"],
            "estimated_development_time": "2 weeks",
            "complexity": "medium",
            "roi_estimate": "positive within one quarter"
        })
        .to_string()
    }

    fn candidates() -> Vec<String> {
        vec!["Playwright".to_string(), "Selenium".to_string()]
    }

    #[tokio::test]
    async fn test_recommend_parses_contract() {
        let provider = Arc::new(StubProvider::completing(recommendation_json()));
        let recommender = ToolRecommender::new(provider, candidates());

        let recommendation = recommender.recommend(&[requirement()]).await.unwrap();
        assert_eq!(recommendation.recommended_tool, "Playwright");
        assert_eq!(recommendation.complexity, Complexity::Medium);
        assert_eq!(recommendation.alternatives, vec!["Selenium"]);
    }

    #[tokio::test]
    async fn test_empty_requirements_never_contact_provider() {
        let provider = Arc::new(StubProvider::completing(recommendation_json()));
        let recommender = ToolRecommender::new(provider.clone(), candidates());

        let err = recommender.recommend(&[]).await.unwrap_err();
        assert!(matches!(err, AppError::PreconditionNotMet(_)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_response_is_schema_violation() {
        let provider = Arc::new(StubProvider::completing("just use Python"));
        let recommender = ToolRecommender::new(provider, candidates());

        let err = recommender.recommend(&[requirement()]).await.unwrap_err();
        assert!(matches!(err, AppError::SchemaViolation(_)));
    }
}
