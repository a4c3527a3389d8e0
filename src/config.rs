//! Pipeline Configuration
//!
//! Runtime settings for the intake pipeline. Provider endpoint/model
//! settings live in `requora_llm::ProviderConfig`.

use serde::{Deserialize, Serialize};

/// Maximum accepted artifact size: 10 MiB
const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Settings for the message-processing pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum accepted file size in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// OCR executable invoked for image text extraction
    #[serde(default = "default_ocr_command")]
    pub ocr_command: String,
    /// OCR language code passed to the executable
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,
    /// Candidate automation tools the recommender chooses among
    #[serde(default = "default_candidate_tools")]
    pub candidate_tools: Vec<String>,
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_ocr_command() -> String {
    "tesseract".to_string()
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

fn default_candidate_tools() -> Vec<String> {
    [
        "n8n",
        "Python",
        "Playwright",
        "Selenium",
        "SikuliX",
        "AutoHotkey",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            ocr_command: default_ocr_command(),
            ocr_language: default_ocr_language(),
            candidate_tools: default_candidate_tools(),
        }
    }
}
