//! Requora
//!
//! A multimodal project-intake pipeline. Stakeholders converse with an
//! assistant, attaching text, images, PDFs, audio, BPMN diagrams,
//! spreadsheets, and documents; the pipeline routes each message to a
//! modality-specific extractor, normalizes the result with telemetry,
//! aggregates a conversation into typed requirements, and synthesizes user
//! stories and a tooling recommendation from them.
//!
//! Transport, persistence, authentication, and file upload are external
//! collaborators: the pipeline receives resolved file paths and returns
//! plain records for the caller to persist. The inference backend is
//! injected as a [`requora_llm::InferenceProvider`], so tests substitute a
//! fake without touching process-wide state.

pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use config::PipelineConfig;
pub use models::{
    AnalysisRecord, Conversation, ConversationStatus, ExtractedRequirement, Message, MessageRole,
    Modality, ProcessedAnalysis, RequirementKind,
};
pub use services::{
    AggregationOutcome, MessagePipeline, MessageSubmission, RequirementAggregator, StoryGenerator,
    ToolRecommender,
};
pub use utils::error::{AppError, AppResult};
