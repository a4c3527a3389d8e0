//! Analysis Models
//!
//! Typed extractor output. Each modality produces one variant of
//! [`AnalysisRecord`]; the record is typed at the extractor boundary and
//! serialized to an opaque mapping on the stored `Message`. The
//! [`ProcessedAnalysis`] envelope is the normalizer's output and the sole
//! shape fed into message creation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::conversation::Modality;
use super::requirement::Complexity;

/// Structured result of the requirement-analysis contract over free text.
///
/// Text, document, audio, and spreadsheet analyses all nest this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub objectives: Vec<String>,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub systems: Vec<String>,
    pub exceptions: Vec<String>,
    pub stakeholders: Vec<String>,
    pub complexity: Complexity,
    pub estimated_hours: f64,
    /// Confidence 0-100
    pub confidence: u8,
    /// Provider token accounting, filled in after parsing
    #[serde(default)]
    pub tokens_used: u32,
}

/// Contour/edge heuristics over an attached image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualAnalysis {
    pub has_text: bool,
    pub contour_count: usize,
    pub width: u32,
    pub height: u32,
    pub estimated_complexity: Complexity,
}

/// Sentiment/tone classification of an audio transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    /// positive / negative / neutral
    pub sentiment: String,
    /// Confidence 0-100
    pub confidence: u8,
    pub key_points: Vec<String>,
    pub emotion: String,
    /// Provider token accounting, filled in after parsing
    #[serde(default)]
    pub tokens_used: u32,
}

/// A task element found in a process definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A gateway element found in a process definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Gateway direction/type attribute; "unspecified" when absent
    pub direction: String,
}

/// One `process` element and its collected children
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub tasks: Vec<TaskNode>,
    pub gateways: Vec<GatewayNode>,
}

/// Structural summary of a loaded worksheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSummary {
    /// Data rows (header excluded)
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    /// Inferred type per column name
    pub column_types: BTreeMap<String, String>,
}

/// Normalized output of one extractor run.
///
/// Internally tagged so the discriminator travels with the serialized
/// mapping stored on the message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisRecord {
    /// Requirement analysis of free text
    #[serde(rename = "text_analysis")]
    Text(TextAnalysis),
    /// OCR + visual heuristics, with nested text analysis when OCR found text
    #[serde(rename = "image_analysis")]
    Image {
        ocr_text: String,
        visual_analysis: VisualAnalysis,
        #[serde(skip_serializing_if = "Option::is_none")]
        text_analysis: Option<TextAnalysis>,
    },
    /// Page-text extraction delegated to the text contract
    #[serde(rename = "document_analysis")]
    Document {
        source: Modality,
        #[serde(flatten)]
        analysis: TextAnalysis,
    },
    /// Transcription, tone classification, and nested text analysis
    #[serde(rename = "audio_analysis")]
    Audio {
        transcript: String,
        sentiment_analysis: SentimentAnalysis,
        text_analysis: TextAnalysis,
    },
    /// Process-diagram walk with deterministic complexity tiering
    #[serde(rename = "bpmn_analysis")]
    Bpmn {
        processes: Vec<ProcessSummary>,
        total_tasks: usize,
        total_gateways: usize,
        complexity: Complexity,
    },
    /// Tabular summary merged with the delegated text analysis
    #[serde(rename = "spreadsheet_analysis")]
    Spreadsheet {
        document_summary: TableSummary,
        #[serde(flatten)]
        analysis: TextAnalysis,
    },
    /// Best-effort placeholder for formats without full content extraction
    #[serde(rename = "document_stub")]
    DocumentStub { source: PathBuf, modality: Modality },
    /// Uniform failure shape produced by dispatch
    #[serde(rename = "error")]
    Error { error: String },
}

impl AnalysisRecord {
    /// The uniform failure record
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    /// Whether this record is the failure variant
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// The failure description, when this record is the failure variant
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { error } => Some(error),
            _ => None,
        }
    }

    /// Total provider tokens consumed producing this record
    pub fn tokens_used(&self) -> u32 {
        match self {
            Self::Text(a) => a.tokens_used,
            Self::Image { text_analysis, .. } => {
                text_analysis.as_ref().map_or(0, |t| t.tokens_used)
            }
            Self::Document { analysis, .. } => analysis.tokens_used,
            Self::Audio {
                sentiment_analysis,
                text_analysis,
                ..
            } => sentiment_analysis.tokens_used + text_analysis.tokens_used,
            Self::Spreadsheet { analysis, .. } => analysis.tokens_used,
            Self::Bpmn { .. } | Self::DocumentStub { .. } | Self::Error { .. } => 0,
        }
    }

    /// One-line human summary used as the assistant message content
    pub fn digest(&self) -> Option<String> {
        match self {
            Self::Text(a) => Some(format!(
                "Requirement analysis: {} objective(s), {} system(s), {} complexity",
                a.objectives.len(),
                a.systems.len(),
                a.complexity
            )),
            Self::Image {
                ocr_text,
                visual_analysis,
                ..
            } => Some(format!(
                "Image analyzed: {} characters of OCR text, {} visual complexity",
                ocr_text.trim().len(),
                visual_analysis.estimated_complexity
            )),
            Self::Document { source, analysis } => Some(format!(
                "{} analyzed: {} objective(s), {} complexity",
                source, analysis.objectives.len(), analysis.complexity
            )),
            Self::Audio {
                transcript,
                sentiment_analysis,
                ..
            } => Some(format!(
                "Audio transcribed ({} characters), {} tone",
                transcript.trim().len(),
                sentiment_analysis.sentiment
            )),
            Self::Bpmn {
                processes,
                total_tasks,
                total_gateways,
                complexity,
            } => Some(format!(
                "{} process(es) with {} task(s) and {} gateway(s), {} complexity",
                processes.len(),
                total_tasks,
                total_gateways,
                complexity
            )),
            Self::Spreadsheet {
                document_summary, ..
            } => Some(format!(
                "Spreadsheet analyzed: {} rows x {} columns",
                document_summary.rows, document_summary.columns
            )),
            Self::DocumentStub { .. } | Self::Error { .. } => None,
        }
    }
}

/// Telemetry envelope the normalizer wraps around every extractor run.
///
/// Elapsed time is always recorded, success or failure; tokens are
/// propagated from the record's own accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedAnalysis {
    pub analysis: AnalysisRecord,
    pub processing_time_ms: u64,
    pub tokens_used: u32,
    pub is_processed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ProcessedAnalysis {
    /// Wrap an extractor's record with derived telemetry
    pub fn from_record(record: AnalysisRecord, elapsed_ms: u64) -> Self {
        let error_message = record.error_message().map(str::to_string);
        Self {
            tokens_used: record.tokens_used(),
            is_processed: error_message.is_none(),
            error_message,
            processing_time_ms: elapsed_ms,
            analysis: record,
        }
    }
}
