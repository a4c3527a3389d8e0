//! Extractor Registry & Dispatch
//!
//! Maps a message's declared modality to the extractor capable of handling
//! it. Dispatch never raises past this boundary: unknown modalities and
//! extractor faults both degrade to the uniform failure record.

pub mod audio;
pub mod document;
pub mod image;
pub mod process_diagram;
pub mod spreadsheet;
pub mod text;

#[cfg(test)]
pub(crate) mod test_support;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use requora_llm::InferenceProvider;

use crate::config::PipelineConfig;
use crate::models::{AnalysisRecord, Modality};
use crate::utils::error::{AppError, AppResult};

pub use audio::AudioExtractor;
pub use document::{PdfExtractor, WordExtractor};
pub use image::ImageExtractor;
pub use process_diagram::BpmnExtractor;
pub use spreadsheet::SpreadsheetExtractor;
pub use text::TextExtractor;

/// The artifact handed to an extractor: text and/or a resolved file path.
#[derive(Debug, Clone, Default)]
pub struct MessagePayload {
    pub text: Option<String>,
    pub file: Option<PathBuf>,
}

impl MessagePayload {
    /// Payload carrying only text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            file: None,
        }
    }

    /// Payload carrying only a file reference
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            text: None,
            file: Some(path.into()),
        }
    }

    /// Non-empty text content, required by the text modality
    pub fn require_text(&self) -> AppResult<&str> {
        self.text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::extraction("message has no text content"))
    }

    /// A resolved, readable file reference, required by all file modalities
    pub fn require_file(&self) -> AppResult<&Path> {
        let path = self
            .file
            .as_deref()
            .ok_or_else(|| AppError::extraction("message has no attached file"))?;
        if !path.is_file() {
            return Err(AppError::extraction(format!(
                "file not readable: {}",
                path.display()
            )));
        }
        Ok(path)
    }
}

/// A modality-specific analysis strategy.
///
/// Implementations are stateless across calls; faults are returned as
/// errors and converted by dispatch, never panicked.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// The modality this extractor handles
    fn modality(&self) -> Modality;

    /// Analyze one artifact into a normalized record
    async fn analyze(&self, payload: &MessagePayload) -> AppResult<AnalysisRecord>;
}

/// Registry mapping modality tags to extractors.
///
/// New modalities are added by registering an extractor; dispatch logic
/// never changes.
pub struct ExtractorRegistry {
    extractors: HashMap<Modality, Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Registry with the built-in extractors for every file/text modality.
    ///
    /// `system` messages deliberately have no extractor; dispatching one
    /// reports the unsupported-modality failure.
    pub fn with_defaults(provider: Arc<dyn InferenceProvider>, config: &PipelineConfig) -> Self {
        let text = Arc::new(TextExtractor::new(provider.clone()));

        let mut registry = Self::new();
        registry.register(text.clone());
        registry.register(Arc::new(ImageExtractor::new(
            text.clone(),
            config.ocr_command.clone(),
            config.ocr_language.clone(),
        )));
        registry.register(Arc::new(PdfExtractor::new(text.clone())));
        registry.register(Arc::new(AudioExtractor::new(provider, text.clone())));
        registry.register(Arc::new(BpmnExtractor::new()));
        registry.register(Arc::new(SpreadsheetExtractor::new(text)));
        registry.register(Arc::new(WordExtractor::new()));
        registry
    }

    /// Register an extractor, replacing any previous one for its modality
    pub fn register(&mut self, extractor: Arc<dyn Extractor>) {
        self.extractors.insert(extractor.modality(), extractor);
    }

    /// Look up the extractor for a modality
    pub fn get(&self, modality: Modality) -> Option<&Arc<dyn Extractor>> {
        self.extractors.get(&modality)
    }

    /// Route a payload to the matching extractor.
    ///
    /// Never fails: unknown modalities and extractor faults are converted
    /// into the failure record.
    pub async fn dispatch(&self, modality: Modality, payload: &MessagePayload) -> AnalysisRecord {
        let Some(extractor) = self.extractors.get(&modality) else {
            let err = AppError::unsupported_modality(modality.as_str());
            return AnalysisRecord::failed(err.to_string());
        };

        debug!(modality = %modality, "dispatching to extractor");

        match extractor.analyze(payload).await {
            Ok(record) => record,
            Err(err) => {
                warn!(modality = %modality, error = %err, "extractor failed");
                AnalysisRecord::failed(err.to_string())
            }
        }
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
