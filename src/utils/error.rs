//! Error Handling
//!
//! Unified error types for the intake pipeline.
//! Uses thiserror for ergonomic error definitions.

use requora_llm::LlmError;
use thiserror::Error;

/// Application-wide error type.
///
/// The first four variants form the pipeline's failure taxonomy: an unknown
/// modality tag, an extractor-internal fault, a response that fails its JSON
/// contract, and an operation invoked before its inputs exist. The rest are
/// ambient conversions.
#[derive(Error, Debug)]
pub enum AppError {
    /// Unknown modality tag
    #[error("unsupported message type: {0}")]
    UnsupportedModality(String),

    /// Extractor-internal fault (bad file, OCR/parse error, inference fault)
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Inference response failed to parse against the expected JSON contract
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// Operation invoked with missing prerequisite data
    #[error("Precondition not met: {0}")]
    PreconditionNotMet(String),

    /// Inference service errors
    #[error("Inference error: {0}")]
    Inference(#[from] LlmError),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create an unsupported-modality error
    pub fn unsupported_modality(tag: impl Into<String>) -> Self {
        Self::UnsupportedModality(tag.into())
    }

    /// Create an extraction error
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create a schema violation error
    pub fn schema_violation(msg: impl Into<String>) -> Self {
        Self::SchemaViolation(msg.into())
    }

    /// Create a precondition error
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::PreconditionNotMet(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Convert AppError to a string
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
