//! Test Support
//!
//! A scripted inference provider for extractor and pipeline tests. Returns
//! queued completion texts in order (repeating the last one), counts calls,
//! and can be forced to fail.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use requora_llm::{
    ChatMessage, ChatResponse, InferenceProvider, LlmError, LlmResult, ProviderConfig,
    Transcription, UsageStats,
};

pub struct StubProvider {
    config: ProviderConfig,
    responses: Vec<String>,
    transcript: String,
    fail: Option<LlmError>,
    calls: AtomicUsize,
}

impl StubProvider {
    /// Tokens reported for every stubbed completion
    pub const STUB_TOKENS: u32 = 21;

    /// Provider answering every completion with the same text
    pub fn completing(text: impl Into<String>) -> Self {
        Self::with_responses(vec![text.into()])
    }

    /// Provider answering completions with the given texts in order,
    /// repeating the last one when exhausted
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            config: ProviderConfig::default(),
            responses,
            transcript: String::new(),
            fail: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider failing every call with the given error
    pub fn failing(error: LlmError) -> Self {
        Self {
            config: ProviderConfig::default(),
            responses: Vec::new(),
            transcript: String::new(),
            fail: Some(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Set the transcript returned by `transcribe`
    pub fn with_transcript(mut self, transcript: impl Into<String>) -> Self {
        self.transcript = transcript.into();
        self
    }

    /// Number of completion calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
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
                input_tokens: 13,
                output_tokens: 8,
            },
            model: "stub-model".to_string(),
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
