//! Conversation Models
//!
//! An intake session and its messages. A `Conversation` owns its `Message`s;
//! requirements extracted from it live in [`crate::models::requirement`].

use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::analysis::ProcessedAnalysis;
use super::requirement::ExtractedRequirement;

/// Declared kind of a message/artifact.
///
/// These are the only recognized tags; adding one means registering a new
/// extractor with the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Image,
    Pdf,
    Audio,
    Bpmn,
    Excel,
    Word,
    System,
}

impl Modality {
    /// Get the string form for storage and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Pdf => "pdf",
            Self::Audio => "audio",
            Self::Bpmn => "bpmn",
            Self::Excel => "excel",
            Self::Word => "word",
            Self::System => "system",
        }
    }

    /// File extensions accepted for this modality
    pub fn accepted_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Text => &["txt", "md"],
            Self::Image => &["jpg", "jpeg", "png", "gif", "bmp"],
            Self::Pdf => &["pdf"],
            Self::Audio => &["mp3", "wav", "m4a"],
            Self::Bpmn => &["bpmn", "xml"],
            Self::Excel => &["xlsx", "xls"],
            Self::Word => &["docx", "doc"],
            Self::System => &[],
        }
    }

    /// Whether this modality carries its payload as an attached file
    pub fn requires_file(&self) -> bool {
        matches!(
            self,
            Self::Image | Self::Pdf | Self::Audio | Self::Bpmn | Self::Excel | Self::Word
        )
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "pdf" => Ok(Self::Pdf),
            "audio" => Ok(Self::Audio),
            "bpmn" => Ok(Self::Bpmn),
            "excel" => Ok(Self::Excel),
            "word" => Ok(Self::Word),
            "system" => Ok(Self::System),
            other => Err(format!("unsupported message type: {}", other)),
        }
    }
}

/// Role of a message within a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    /// Get the string form for storage and transcripts
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

/// Lifecycle status of an intake session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Active,
    Completed,
    Archived,
}

/// A stakeholder's intake session.
///
/// The requirement set and `confidence_score` are written only by a
/// successful aggregation run; `confidence_score` stays `None` until then.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub status: ConversationStatus,
    /// Aggregator-produced summary of the whole conversation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    /// Consolidated requirement set, replaced wholesale by the aggregator
    #[serde(default)]
    pub extracted_requirements: Vec<ExtractedRequirement>,
    /// Aggregate confidence (0-100) reported by the last aggregation run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Conversation {
    /// Start a new active intake session
    pub fn new(project_id: Uuid, user_id: Uuid, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            user_id,
            title: title.into(),
            status: ConversationStatus::Active,
            ai_summary: None,
            extracted_requirements: Vec::new(),
            confidence_score: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Mark the session completed
    pub fn complete(&mut self) {
        let now = Utc::now();
        self.status = ConversationStatus::Completed;
        self.completed_at = Some(now);
        self.updated_at = now;
    }

    /// Archive the session
    pub fn archive(&mut self) {
        self.status = ConversationStatus::Archived;
        self.updated_at = Utc::now();
    }
}

/// Metadata for a file already persisted by the file-store collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAttachment {
    /// Resolved, readable path
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// MIME type, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// One turn in a conversation.
///
/// Immutable once created; the pipeline writes the analysis/telemetry fields
/// at creation time and there is no later edit path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub modality: Modality,
    pub role: MessageRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    /// Opaque analysis mapping; empty object when unprocessed or failed
    pub analysis: serde_json::Value,
    pub tokens_used: u32,
    pub processing_time_ms: u64,
    pub is_processed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create the stakeholder's message for a submission.
    ///
    /// Analysis lives on the paired assistant message; the user message
    /// itself has nothing pending, so it is marked processed.
    pub fn user(
        conversation_id: Uuid,
        modality: Modality,
        content: Option<String>,
        file: Option<&FileAttachment>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation_id,
            modality,
            role: MessageRole::User,
            content,
            file_path: file.map(|f| f.path.clone()),
            file_size: file.map(|f| f.size),
            file_type: file.and_then(|f| f.content_type.clone()),
            analysis: serde_json::json!({}),
            tokens_used: 0,
            processing_time_ms: 0,
            is_processed: true,
            error_message: None,
            created_at: Utc::now(),
        }
    }

    /// Create the paired assistant message carrying a normalized analysis.
    ///
    /// On failure the analysis mapping stays empty and the error moves into
    /// `error_message`; on success the record is serialized into `analysis`.
    pub fn assistant(
        conversation_id: Uuid,
        content: Option<String>,
        processed: &ProcessedAnalysis,
    ) -> Self {
        let analysis = if processed.is_processed {
            serde_json::to_value(&processed.analysis).unwrap_or_else(|_| serde_json::json!({}))
        } else {
            serde_json::json!({})
        };

        Self {
            id: Uuid::new_v4(),
            conversation_id,
            modality: Modality::Text,
            role: MessageRole::Assistant,
            content,
            file_path: None,
            file_size: None,
            file_type: None,
            analysis,
            tokens_used: processed.tokens_used,
            processing_time_ms: processed.processing_time_ms,
            is_processed: processed.is_processed,
            error_message: processed.error_message.clone(),
            created_at: Utc::now(),
        }
    }
}
