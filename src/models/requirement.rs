//! Requirement Models
//!
//! Atomic, typed, prioritized needs extracted from a conversation by the
//! aggregator. Validation fields are reserved for human reviewers; the
//! pipeline never sets them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of an extracted requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    Objective,
    Input,
    Output,
    Exception,
    System,
    Stakeholder,
    Process,
    BusinessRule,
}

impl RequirementKind {
    /// Get the string form for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Objective => "objective",
            Self::Input => "input",
            Self::Output => "output",
            Self::Exception => "exception",
            Self::System => "system",
            Self::Stakeholder => "stakeholder",
            Self::Process => "process",
            Self::BusinessRule => "business_rule",
        }
    }
}

/// Estimated complexity tier, shared by analyses, requirements, and the
/// tooling recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// One atomic requirement extracted from a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedRequirement {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub kind: RequirementKind,
    pub description: String,
    /// Free-form detail mapping
    #[serde(default)]
    pub details: serde_json::Value,
    /// Confidence 0-100
    pub confidence: u8,
    pub validated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validated_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validated_at: Option<DateTime<Utc>>,
    /// Priority; the aggregator emits 1-5 but the range is open
    pub priority: i32,
    pub complexity: Complexity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExtractedRequirement {
    /// Create an unvalidated requirement as the aggregator does
    pub fn new(
        conversation_id: Uuid,
        kind: RequirementKind,
        description: impl Into<String>,
        details: serde_json::Value,
        confidence: u8,
        priority: i32,
        complexity: Complexity,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            conversation_id,
            kind,
            description: description.into(),
            details,
            confidence: confidence.min(100),
            validated: false,
            validated_by: None,
            validated_at: None,
            priority,
            complexity,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a human reviewer's sign-off. The only mutation after creation.
    pub fn mark_validated(&mut self, reviewer: Uuid) {
        let now = Utc::now();
        self.validated = true;
        self.validated_by = Some(reviewer);
        self.validated_at = Some(now);
        self.updated_at = now;
    }
}
