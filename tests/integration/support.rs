//! Shared test support: a scripted inference provider and fixture payloads.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use requora_llm::{
    ChatMessage, ChatResponse, InferenceProvider, LlmError, LlmResult, ProviderConfig,
    Transcription, UsageStats,
};

/// Inference provider answering completions from a scripted queue.
///
/// Responses are returned in order, repeating the last one when the queue is
/// exhausted. Calls are counted so tests can assert the provider was (not)
/// contacted.
pub struct ScriptedProvider {
    config: ProviderConfig,
    responses: Vec<String>,
    transcript: String,
    fail: Option<LlmError>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn completing(text: impl Into<String>) -> Arc<Self> {
        Self::with_responses(vec![text.into()])
    }

    pub fn with_responses(responses: Vec<String>) -> Arc<Self> {
        Arc::new(Self {
            config: ProviderConfig::default(),
            responses,
            transcript: String::new(),
            fail: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(error: LlmError) -> Arc<Self> {
        Arc::new(Self {
            config: ProviderConfig::default(),
            responses: Vec::new(),
            transcript: String::new(),
            fail: Some(error),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(
        &self,
        _messages: Vec<ChatMessage>,
        _system: Option<String>,
    ) -> LlmResult<ChatResponse> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = &self.fail {
            return Err(err.clone());
        }

        let content = self
            .responses
            .get(index.min(self.responses.len().saturating_sub(1)))
            .cloned()
            .unwrap_or_default();

        Ok(ChatResponse {
            content: Some(content),
            usage: UsageStats {
                input_tokens: 40,
                output_tokens: 25,
            },
            model: "scripted-model".to_string(),
        })
    }

    async fn transcribe(&self, _audio_path: &Path) -> LlmResult<Transcription> {
        if let Some(err) = &self.fail {
            return Err(err.clone());
        }
        Ok(Transcription {
            text: self.transcript.clone(),
        })
    }

    async fn health_check(&self) -> LlmResult<()> {
        Ok(())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

/// A well-formed requirement-analysis response
pub fn text_analysis_json() -> String {
    serde_json::json!({
        "objectives": ["automate monthly invoice reconciliation"],
        "inputs": ["ERP export", "bank statement"],
        "outputs": ["reconciliation report"],
        "systems": ["ERP", "bank portal"],
        "exceptions": ["unmatched transactions escalate to an analyst"],
        "stakeholders": ["finance team"],
        "complexity": "medium",
        "estimated_hours": 60,
        "confidence": 82
    })
    .to_string()
}

/// A well-formed aggregation response
pub fn aggregation_json() -> String {
    serde_json::json!({
        "requirements": [
            {
                "type": "objective",
                "description": "Automate invoice reconciliation",
                "priority": 1,
                "complexity": "medium",
                "confidence": 85
            },
            {
                "type": "exception",
                "description": "Escalate unmatched transactions",
                "priority": 2,
                "complexity": "low",
                "confidence": 75
            }
        ],
        "summary": "Finance wants reconciliation automated end to end",
        "estimated_hours": 120,
        "recommended_tools": ["n8n", "Python"],
        "confidence": 80
    })
    .to_string()
}
