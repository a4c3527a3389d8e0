//! Aggregation and Synthesis Integration Tests
//!
//! The second half of the pipeline: conversation history in, requirement
//! set out, then user stories and a tool recommendation from that set.

use requora::config::PipelineConfig;
use requora::models::{Conversation, Modality, RequirementKind};
use requora::services::aggregator::RequirementAggregator;
use requora::services::pipeline::{MessagePipeline, MessageSubmission};
use requora::services::synthesis::{StoryGenerator, ToolRecommender};
use requora::utils::error::AppError;
use uuid::Uuid;

use crate::support::{aggregation_json, text_analysis_json, ScriptedProvider};

fn conversation() -> Conversation {
    Conversation::new(Uuid::new_v4(), Uuid::new_v4(), "Invoice intake")
}

fn stories_json() -> String {
    serde_json::json!({
        "user_stories": [
            {
                "title": "Automated reconciliation run",
                "description": "As a finance analyst, I want reconciliation to run automatically so that month-end closes faster",
                "acceptance_criteria": ["runs unattended", "report generated"],
                "story_points": 8,
                "priority": 1,
                "business_value": 5
            },
            {
                "title": "Exception queue",
                "description": "As a finance analyst, I want unmatched transactions queued so that I only review exceptions",
                "acceptance_criteria": ["queue lists mismatches"],
                "story_points": 5,
                "priority": 2,
                "business_value": 4
            }
        ]
    })
    .to_string()
}

fn recommendation_json() -> String {
    serde_json::json!({
        "recommended_tool": "n8n",
        "reasoning": "API-driven integration between two systems",
        "alternatives": ["Python"],
        "estimated_development_time": "3 weeks",
        "complexity": "medium",
        "roi_estimate": "break-even in two months"
    })
    .to_string()
}

// ============================================================================
// Aggregation
// ============================================================================

#[tokio::test]
async fn test_zero_message_aggregation_leaves_confidence_unset() {
    let provider = ScriptedProvider::completing(aggregation_json());
    let aggregator = RequirementAggregator::new(provider.clone());
    let mut conv = conversation();

    let outcome = aggregator.aggregate(&conv, &[]).await.unwrap();
    assert!(outcome.requirements.is_empty());

    outcome.apply_to(&mut conv);
    assert!(conv.confidence_score.is_none());
    assert!(conv.extracted_requirements.is_empty());
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_intake_to_backlog_flow() {
    // One scripted provider drives the whole flow in call order:
    // text analysis, aggregation, user stories, tool recommendation.
    let provider = ScriptedProvider::with_responses(vec![
        text_analysis_json(),
        aggregation_json(),
        stories_json(),
        recommendation_json(),
    ]);

    let pipeline = MessagePipeline::new(provider.clone(), PipelineConfig::default());
    let mut conv = conversation();

    // Stakeholder submits one text message
    let (user, assistant) = pipeline
        .handle_submission(
            &conv,
            MessageSubmission {
                modality: Modality::Text,
                content: Some(
                    "Automate monthly invoice reconciliation between ERP and bank statement"
                        .to_string(),
                ),
                file: None,
            },
        )
        .await
        .unwrap();
    assert!(assistant.is_processed);

    // Aggregation reads the persisted history
    let aggregator = RequirementAggregator::new(provider.clone());
    let outcome = aggregator
        .aggregate(&conv, &[user, assistant])
        .await
        .unwrap();
    assert_eq!(outcome.requirements.len(), 2);
    assert_eq!(outcome.requirements[0].kind, RequirementKind::Objective);

    outcome.apply_to(&mut conv);
    assert_eq!(conv.confidence_score, Some(80));
    assert!(conv.ai_summary.as_deref().unwrap().contains("Finance"));

    // Both synthesizers consume only the requirement set
    let stories = StoryGenerator::new(provider.clone())
        .generate(&conv.extracted_requirements)
        .await
        .unwrap();
    assert_eq!(stories.len(), 2);
    assert!(stories[0].description.starts_with("As a"));

    let recommendation = ToolRecommender::new(
        provider.clone(),
        PipelineConfig::default().candidate_tools,
    )
    .recommend(&conv.extracted_requirements)
    .await
    .unwrap();
    assert_eq!(recommendation.recommended_tool, "n8n");

    assert_eq!(provider.call_count(), 4);
}

#[tokio::test]
async fn test_failed_aggregation_preserves_previous_set() {
    let provider = ScriptedProvider::with_responses(vec![
        aggregation_json(),
        "garbage, not json".to_string(),
    ]);
    let aggregator = RequirementAggregator::new(provider.clone());
    let mut conv = conversation();
    let messages = vec![requora::models::Message::user(
        conv.id,
        Modality::Text,
        Some("Automate reconciliation".to_string()),
        None,
    )];

    // First run succeeds and installs a set
    let outcome = aggregator.aggregate(&conv, &messages).await.unwrap();
    outcome.apply_to(&mut conv);
    assert_eq!(conv.extracted_requirements.len(), 2);

    // Second run violates the contract; conversation state is untouched
    let err = aggregator.aggregate(&conv, &messages).await.unwrap_err();
    assert!(matches!(err, AppError::SchemaViolation(_)));
    assert_eq!(conv.extracted_requirements.len(), 2);
    assert_eq!(conv.confidence_score, Some(80));
}

// ============================================================================
// Synthesis preconditions
// ============================================================================

#[tokio::test]
async fn test_story_generation_requires_requirements() {
    let provider = ScriptedProvider::completing(stories_json());
    let generator = StoryGenerator::new(provider.clone());

    let err = generator.generate(&[]).await.unwrap_err();
    assert!(matches!(err, AppError::PreconditionNotMet(_)));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_tool_recommendation_requires_requirements() {
    let provider = ScriptedProvider::completing(recommendation_json());
    let recommender = ToolRecommender::new(
        provider.clone(),
        PipelineConfig::default().candidate_tools,
    );

    let err = recommender.recommend(&[]).await.unwrap_err();
    assert!(matches!(err, AppError::PreconditionNotMet(_)));
    assert_eq!(provider.call_count(), 0);
}
