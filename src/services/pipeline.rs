//! Message Pipeline
//!
//! The normalizer around dispatch: measures wall-clock time, derives token
//! and status telemetry, and builds the user/assistant message pair for a
//! submission. Per-message failures degrade to a recorded failed message;
//! they never abort the turn.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use requora_llm::InferenceProvider;

use crate::config::PipelineConfig;
use crate::models::{
    AnalysisRecord, Conversation, ConversationStatus, FileAttachment, Message, Modality,
    ProcessedAnalysis,
};
use crate::services::extraction::{ExtractorRegistry, MessagePayload};
use crate::utils::error::{AppError, AppResult};

/// Fallback assistant content when a record has no digest
const PROCESSED_FALLBACK: &str = "Processed successfully";

/// One inbound submission: content and/or an already-persisted file
#[derive(Debug, Clone)]
pub struct MessageSubmission {
    pub modality: Modality,
    pub content: Option<String>,
    pub file: Option<PathBuf>,
}

/// The message-processing pipeline.
///
/// Stateless across invocations; each call is one independent run against
/// the injected provider.
pub struct MessagePipeline {
    registry: ExtractorRegistry,
    config: PipelineConfig,
}

impl MessagePipeline {
    /// Pipeline with the built-in extractor set
    pub fn new(provider: Arc<dyn InferenceProvider>, config: PipelineConfig) -> Self {
        let registry = ExtractorRegistry::with_defaults(provider, &config);
        Self { registry, config }
    }

    /// Pipeline over a caller-assembled registry
    pub fn with_registry(registry: ExtractorRegistry, config: PipelineConfig) -> Self {
        Self { registry, config }
    }

    /// Dispatch a payload and wrap the result with telemetry.
    ///
    /// Elapsed time is measured from entry to extractor return and recorded
    /// on failures too. This envelope is the only shape fed into message
    /// creation.
    pub async fn process(&self, modality: Modality, payload: &MessagePayload) -> ProcessedAnalysis {
        let started = Instant::now();

        let record = match self.check_artifact(modality, payload) {
            Ok(()) => self.registry.dispatch(modality, payload).await,
            Err(err) => AnalysisRecord::failed(err.to_string()),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let processed = ProcessedAnalysis::from_record(record, elapsed_ms);

        debug!(
            modality = %modality,
            processed = processed.is_processed,
            elapsed_ms,
            tokens = processed.tokens_used,
            "message processed"
        );

        processed
    }

    /// Handle one conversation turn: create the stakeholder message, run the
    /// pipeline, and create the derived assistant message.
    ///
    /// The user message is returned first and must be persisted first;
    /// a crash between the two leaves a re-drivable turn, not corruption.
    pub async fn handle_submission(
        &self,
        conversation: &Conversation,
        submission: MessageSubmission,
    ) -> AppResult<(Message, Message)> {
        if conversation.status != ConversationStatus::Active {
            return Err(AppError::validation(format!(
                "conversation {} is not active",
                conversation.id
            )));
        }

        let attachment = submission.file.as_deref().map(describe_file);

        let user_message = Message::user(
            conversation.id,
            submission.modality,
            submission.content.clone(),
            attachment.as_ref(),
        );

        let payload = MessagePayload {
            text: submission.content,
            file: submission.file,
        };
        let processed = self.process(submission.modality, &payload).await;

        let content = if processed.is_processed {
            processed
                .analysis
                .digest()
                .unwrap_or_else(|| PROCESSED_FALLBACK.to_string())
        } else {
            processed
                .error_message
                .clone()
                .unwrap_or_else(|| "processing failed".to_string())
        };

        let assistant_message = Message::assistant(conversation.id, Some(content), &processed);

        Ok((user_message, assistant_message))
    }

    /// Size and extension guards applied before dispatch.
    ///
    /// Unreadable files are left to the extractor so the failure message
    /// names the real problem.
    fn check_artifact(&self, modality: Modality, payload: &MessagePayload) -> AppResult<()> {
        let Some(path) = payload.file.as_deref() else {
            return Ok(());
        };
        if !path.is_file() {
            return Ok(());
        }

        let size = std::fs::metadata(path)?.len();
        if size > self.config.max_file_size {
            return Err(AppError::extraction(format!(
                "file too large: {} bytes (max {})",
                size, self.config.max_file_size
            )));
        }

        let accepted = modality.accepted_extensions();
        if !accepted.is_empty() {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
                .unwrap_or_default();
            if !accepted.contains(&ext.as_str()) {
                return Err(AppError::extraction(format!(
                    "file extension '{}' not accepted for {} messages",
                    ext, modality
                )));
            }
        }

        Ok(())
    }
}

/// Build attachment metadata for an already-persisted file
fn describe_file(path: &Path) -> FileAttachment {
    FileAttachment {
        path: path.to_path_buf(),
        size: std::fs::metadata(path).map(|m| m.len()).unwrap_or(0),
        content_type: path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| content_type_for_extension(&e.to_lowercase()).to_string()),
    }
}

/// MIME type for an accepted file extension
fn content_type_for_extension(ext: &str) -> &'static str {
    match ext {
        "txt" => "text/plain",
        "md" => "text/markdown",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "pdf" => "application/pdf",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "bpmn" | "xml" => "application/xml",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "doc" => "application/msword",
        _ => "application/octet-stream",
    }
}
