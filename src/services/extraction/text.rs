//! Text Extractor
//!
//! Sends raw text through the fixed requirement-analysis contract and
//! parses the strict JSON result. Malformed JSON is a hard failure for the
//! extraction, surfaced as a schema violation rather than defaulted.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use requora_llm::{ChatMessage, InferenceProvider};

use crate::models::{AnalysisRecord, Modality, TextAnalysis};
use crate::services::prompts;
use crate::utils::error::{AppError, AppResult};
use crate::utils::json::extract_json_from_response;

use super::{Extractor, MessagePayload};

/// Requirement analysis over free text
pub struct TextExtractor {
    provider: Arc<dyn InferenceProvider>,
}

impl TextExtractor {
    /// Create a new text extractor backed by the given provider
    pub fn new(provider: Arc<dyn InferenceProvider>) -> Self {
        Self { provider }
    }

    /// Run the requirement-analysis contract over a piece of text.
    ///
    /// This is the public contract other extractors delegate to for their
    /// derived text (OCR output, transcripts, page text, rendered tables).
    pub async fn analyze_text(&self, text: &str) -> AppResult<TextAnalysis> {
        let response = self
            .provider
            .complete(vec![ChatMessage::user(text)], Some(prompts::REQUIREMENT_ANALYSIS.to_string()))
            .await?;

        let raw = response.text()?;
        let json = extract_json_from_response(raw);

        debug!(tokens = response.usage.total_tokens(), "text analysis response received");

        let mut analysis: TextAnalysis = serde_json::from_str(&json).map_err(|e| {
            AppError::schema_violation(format!("requirement analysis did not match contract: {}", e))
        })?;
        analysis.tokens_used = response.usage.total_tokens();

        Ok(analysis)
    }
}

#[async_trait]
impl Extractor for TextExtractor {
    fn modality(&self) -> Modality {
        Modality::Text
    }

    async fn analyze(&self, payload: &MessagePayload) -> AppResult<AnalysisRecord> {
        let text = payload.require_text()?;
        let analysis = self.analyze_text(text).await?;
        Ok(AnalysisRecord::Text(analysis))
    }
}
