//! Prompt Contracts
//!
//! Fixed system prompts sent to the inference service. Each documents the
//! exact JSON schema the caller parses strictly; responses that fail the
//! schema are surfaced as schema violations, never coerced.

/// Requirement analysis over free text
pub const REQUIREMENT_ANALYSIS: &str = r#"You are an expert in process-automation requirements analysis.
Analyze the provided text and extract:
1. Process objectives
2. Inputs and outputs
3. Systems involved
4. Exceptions and business rules
5. Stakeholders
6. Estimated complexity

Respond in JSON with the following structure:
{
    "objectives": ["list of objectives"],
    "inputs": ["list of inputs"],
    "outputs": ["list of outputs"],
    "systems": ["systems involved"],
    "exceptions": ["identified exceptions"],
    "stakeholders": ["stakeholders"],
    "complexity": "low/medium/high",
    "estimated_hours": 0,
    "confidence": 0-100
}"#;

/// Sentiment/tone classification of an audio transcript
pub const SENTIMENT_ANALYSIS: &str = r#"Analyze the sentiment and tone of the following transcript.

Respond in JSON:
{
    "sentiment": "positive/negative/neutral",
    "confidence": 0-100,
    "key_points": ["main points"],
    "emotion": "emotion detected"
}"#;

/// Conversation-wide requirement consolidation
pub const REQUIREMENT_AGGREGATION: &str = r#"Analyze the full conversation and extract consolidated requirements.
Group them by type and priority.

Respond in JSON:
{
    "requirements": [
        {
            "type": "objective/input/output/exception/system/stakeholder/process/business_rule",
            "description": "description",
            "priority": 1-5,
            "complexity": "low/medium/high",
            "confidence": 0-100
        }
    ],
    "summary": "overall summary",
    "estimated_hours": 0,
    "recommended_tools": ["list of tools"],
    "confidence": 0-100
}"#;

/// User-story generation from a requirement set
pub const USER_STORIES: &str = r#"Generate user stories from the provided requirements.
Use the format: "As a [type of user], I want [capability] so that [benefit]".

Respond in JSON:
{
    "user_stories": [
        {
            "title": "title",
            "description": "complete description",
            "acceptance_criteria": ["criteria"],
            "story_points": 1-13,
            "priority": 1-5,
            "business_value": 1-5
        }
    ]
}"#;

/// Automation-tool recommendation, constrained to a candidate list
pub fn tool_recommendation(candidates: &[String]) -> String {
    format!(
        r#"Analyze the requirements and recommend the best automation tool.
Consider only: {}.

Respond in JSON:
{{
    "recommended_tool": "tool name",
    "reasoning": "justification",
    "alternatives": ["alternatives"],
    "estimated_development_time": "estimated time",
    "complexity": "low/medium/high",
    "roi_estimate": "ROI estimate"
}}"#,
        candidates.join(", ")
    )
}
