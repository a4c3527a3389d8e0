//! Requora LLM
//!
//! Inference-service boundary for the Requora intake pipeline. Exposes the
//! two capabilities the pipeline consumes — chat-style completions expected
//! to return schema-documented JSON, and speech-to-text transcription —
//! behind one provider trait, with an OpenAI-compatible implementation.

pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use openai::OpenAiProvider;
pub use provider::InferenceProvider;
pub use types::*;
