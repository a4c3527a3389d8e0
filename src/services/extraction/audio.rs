//! Audio Extractor
//!
//! Transcribes audio through the provider's speech-to-text capability,
//! classifies sentiment/tone over the transcript, and delegates the
//! transcript to the text extractor.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use requora_llm::{ChatMessage, InferenceProvider};

use crate::models::{AnalysisRecord, Modality, SentimentAnalysis};
use crate::services::prompts;
use crate::utils::error::{AppError, AppResult};
use crate::utils::json::extract_json_from_response;

use super::text::TextExtractor;
use super::{Extractor, MessagePayload};

/// Transcription + tone classification over attached audio
pub struct AudioExtractor {
    provider: Arc<dyn InferenceProvider>,
    text: Arc<TextExtractor>,
}

impl AudioExtractor {
    /// Create an audio extractor delegating transcripts to `text`
    pub fn new(provider: Arc<dyn InferenceProvider>, text: Arc<TextExtractor>) -> Self {
        Self { provider, text }
    }

    /// Classify sentiment and tone over a transcript
    async fn classify_sentiment(&self, transcript: &str) -> AppResult<SentimentAnalysis> {
        let response = self
            .provider
            .complete(
                vec![ChatMessage::user(transcript)],
                Some(prompts::SENTIMENT_ANALYSIS.to_string()),
            )
            .await?;

        let raw = response.text()?;
        let json = extract_json_from_response(raw);

        let mut sentiment: SentimentAnalysis = serde_json::from_str(&json).map_err(|e| {
            AppError::schema_violation(format!("sentiment analysis did not match contract: {}", e))
        })?;
        sentiment.tokens_used = response.usage.total_tokens();

        Ok(sentiment)
    }
}

#[async_trait]
impl Extractor for AudioExtractor {
    fn modality(&self) -> Modality {
        Modality::Audio
    }

    async fn analyze(&self, payload: &MessagePayload) -> AppResult<AnalysisRecord> {
        let path = payload.require_file()?;

        let transcript = self.provider.transcribe(path).await?.text;

        debug!(chars = transcript.len(), "audio transcribed");

        let sentiment_analysis = self.classify_sentiment(&transcript).await?;
        let text_analysis = self.text.analyze_text(&transcript).await?;

        Ok(AnalysisRecord::Audio {
            transcript,
            sentiment_analysis,
            text_analysis,
        })
    }
}
