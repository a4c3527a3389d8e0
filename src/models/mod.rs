//! Data models for the intake pipeline

pub mod analysis;
pub mod conversation;
pub mod requirement;

pub use analysis::{
    AnalysisRecord, GatewayNode, ProcessSummary, ProcessedAnalysis, SentimentAnalysis,
    TableSummary, TaskNode, TextAnalysis, VisualAnalysis,
};
pub use conversation::{
    Conversation, ConversationStatus, FileAttachment, Message, MessageRole, Modality,
};
pub use requirement::{Complexity, ExtractedRequirement, RequirementKind};
