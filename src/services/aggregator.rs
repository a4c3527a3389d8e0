//! Requirement Aggregator
//!
//! Consolidates a conversation's messages and per-message analyses into a
//! typed, prioritized requirement set plus a conversation-level summary.
//! One inference call per invocation; failure leaves prior state untouched.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use requora_llm::{ChatMessage, InferenceProvider};

use crate::models::{Complexity, Conversation, ExtractedRequirement, Message, RequirementKind};
use crate::services::prompts;
use crate::utils::error::{AppError, AppResult};
use crate::utils::json::extract_json_from_response;

/// Result of one aggregation run.
///
/// `confidence` is the aggregate value the inference service self-reports;
/// it is not recomputed from per-message confidences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationOutcome {
    pub requirements: Vec<ExtractedRequirement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub estimated_hours: f64,
    pub recommended_tools: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
}

impl AggregationOutcome {
    /// The outcome of aggregating an empty conversation
    pub fn empty() -> Self {
        Self {
            requirements: Vec::new(),
            summary: None,
            estimated_hours: 0.0,
            recommended_tools: Vec::new(),
            confidence: None,
        }
    }

    /// Install this outcome on the conversation.
    ///
    /// A non-empty requirement sequence replaces the previous set wholesale;
    /// an empty one writes no requirements but still refreshes the summary
    /// and confidence. Cleanup of superseded persisted rows is the caller's
    /// concern.
    pub fn apply_to(&self, conversation: &mut Conversation) {
        if !self.requirements.is_empty() {
            conversation.extracted_requirements = self.requirements.clone();
        }
        if let Some(summary) = &self.summary {
            conversation.ai_summary = Some(summary.clone());
        }
        if let Some(confidence) = self.confidence {
            conversation.confidence_score = Some(confidence);
        }
        conversation.updated_at = Utc::now();
    }
}

/// Consolidates conversation history into requirements
pub struct RequirementAggregator {
    provider: Arc<dyn InferenceProvider>,
}

impl RequirementAggregator {
    /// Create a new aggregator backed by the given provider
    pub fn new(provider: Arc<dyn InferenceProvider>) -> Self {
        Self { provider }
    }

    /// Aggregate the conversation's full message history.
    ///
    /// A conversation with zero messages yields the empty outcome without
    /// contacting the provider. Inference or contract failures return an
    /// error without partially committing requirements.
    pub async fn aggregate(
        &self,
        conversation: &Conversation,
        messages: &[Message],
    ) -> AppResult<AggregationOutcome> {
        if messages.is_empty() {
            debug!(conversation = %conversation.id, "no messages to aggregate");
            return Ok(AggregationOutcome::empty());
        }

        let context = build_context(conversation, messages);

        let response = self
            .provider
            .complete(
                vec![ChatMessage::user(context)],
                Some(prompts::REQUIREMENT_AGGREGATION.to_string()),
            )
            .await?;

        let raw = response.text()?;
        let json = extract_json_from_response(raw);

        let parsed: AggregationResponse = serde_json::from_str(&json).map_err(|e| {
            AppError::schema_violation(format!("aggregation did not match contract: {}", e))
        })?;

        debug!(
            conversation = %conversation.id,
            requirements = parsed.requirements.len(),
            "aggregation response parsed"
        );

        let requirements = parsed
            .requirements
            .into_iter()
            .map(|tuple| {
                ExtractedRequirement::new(
                    conversation.id,
                    tuple.kind,
                    tuple.description,
                    tuple.details,
                    tuple.confidence,
                    tuple.priority,
                    tuple.complexity,
                )
            })
            .collect();

        Ok(AggregationOutcome {
            requirements,
            summary: Some(parsed.summary),
            estimated_hours: parsed.estimated_hours,
            recommended_tools: parsed.recommended_tools,
            confidence: Some(parsed.confidence),
        })
    }
}

/// Serialize the conversation into the aggregation context: role-tagged
/// transcript lines plus each processed message's analysis mapping.
fn build_context(conversation: &Conversation, messages: &[Message]) -> String {
    let mut out = format!("Conversation: {}\n\n", conversation.title);

    for message in messages {
        let content = message.content.as_deref().unwrap_or("(file attachment)");
        out.push_str(&format!(
            "[{} | {}] {}\n",
            message.role.as_str(),
            message.modality,
            content
        ));

        let has_analysis = message
            .analysis
            .as_object()
            .map(|o| !o.is_empty())
            .unwrap_or(false);
        if message.is_processed && has_analysis {
            out.push_str(&format!("analysis: {}\n", message.analysis));
        }
    }

    out
}

/// Wire shape of the aggregation contract
#[derive(Debug, Deserialize)]
struct AggregationResponse {
    requirements: Vec<RequirementTuple>,
    summary: String,
    #[serde(default)]
    estimated_hours: f64,
    #[serde(default)]
    recommended_tools: Vec<String>,
    confidence: u8,
}

#[derive(Debug, Deserialize)]
struct RequirementTuple {
    #[serde(rename = "type")]
    kind: RequirementKind,
    description: String,
    #[serde(default = "empty_details")]
    details: serde_json::Value,
    priority: i32,
    complexity: Complexity,
    confidence: u8,
}

fn empty_details() -> serde_json::Value {
    serde_json::json!({})
}
