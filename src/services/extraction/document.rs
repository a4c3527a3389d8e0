//! Document Extractors
//!
//! PDF text extraction delegating to the text contract, and the best-effort
//! placeholder for word-processor formats whose content extraction is not
//! implemented. The placeholder is deliberately not an error: the pipeline
//! records what it knows and moves on.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::models::{AnalysisRecord, Modality};
use crate::utils::error::{AppError, AppResult};

use super::text::TextExtractor;
use super::{Extractor, MessagePayload};

/// PDF text extraction + requirement analysis
pub struct PdfExtractor {
    text: Arc<TextExtractor>,
}

impl PdfExtractor {
    /// Create a PDF extractor delegating page text to `text`
    pub fn new(text: Arc<TextExtractor>) -> Self {
        Self { text }
    }
}

#[async_trait]
impl Extractor for PdfExtractor {
    fn modality(&self) -> Modality {
        Modality::Pdf
    }

    async fn analyze(&self, payload: &MessagePayload) -> AppResult<AnalysisRecord> {
        let path = payload.require_file()?;

        // All pages concatenated; pdf-extract separates pages with form feeds
        let text = pdf_extract::extract_text(path)
            .map_err(|e| AppError::extraction(format!("failed to extract PDF text: {}", e)))?;

        debug!(chars = text.len(), "PDF text extracted");

        let analysis = self.text.analyze_text(&text).await?;

        Ok(AnalysisRecord::Document {
            source: Modality::Pdf,
            analysis,
        })
    }
}

/// Placeholder extractor for word-processor documents
pub struct WordExtractor;

impl WordExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for WordExtractor {
    fn modality(&self) -> Modality {
        Modality::Word
    }

    async fn analyze(&self, payload: &MessagePayload) -> AppResult<AnalysisRecord> {
        let path = payload.require_file()?;

        Ok(AnalysisRecord::DocumentStub {
            source: path.to_path_buf(),
            modality: Modality::Word,
        })
    }
}
