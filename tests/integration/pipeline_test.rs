//! Pipeline Integration Tests
//!
//! Message turns through the full registry: dispatch, normalization, and
//! user/assistant pair construction across modalities.

use std::sync::Arc;

use async_trait::async_trait;

use requora::config::PipelineConfig;
use requora::models::{AnalysisRecord, Conversation, MessageRole, Modality};
use requora::services::extraction::{Extractor, ExtractorRegistry, MessagePayload};
use requora::services::pipeline::{MessagePipeline, MessageSubmission};
use requora::utils::error::AppResult;
use uuid::Uuid;

use crate::support::{text_analysis_json, ScriptedProvider};

fn conversation() -> Conversation {
    Conversation::new(Uuid::new_v4(), Uuid::new_v4(), "Invoice intake")
}

fn text_submission(content: &str) -> MessageSubmission {
    MessageSubmission {
        modality: Modality::Text,
        content: Some(content.to_string()),
        file: None,
    }
}

// ============================================================================
// Text turns
// ============================================================================

#[tokio::test]
async fn test_text_turn_end_to_end() {
    let provider = ScriptedProvider::completing(text_analysis_json());
    let pipeline = MessagePipeline::new(provider.clone(), PipelineConfig::default());
    let conversation = conversation();

    let (user, assistant) = pipeline
        .handle_submission(
            &conversation,
            text_submission(
                "Automate monthly invoice reconciliation between ERP and bank statement",
            ),
        )
        .await
        .unwrap();

    assert_eq!(user.role, MessageRole::User);
    assert_eq!(user.modality, Modality::Text);
    assert!(user.content.as_deref().unwrap().contains("reconciliation"));

    assert_eq!(assistant.role, MessageRole::Assistant);
    assert!(assistant.is_processed);
    assert_eq!(assistant.analysis["type"], "text_analysis");
    assert!(!assistant.analysis["objectives"]
        .as_array()
        .unwrap()
        .is_empty());
    let complexity = assistant.analysis["complexity"].as_str().unwrap();
    assert!(["low", "medium", "high"].contains(&complexity));
    assert!(assistant.tokens_used > 0);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_text_turn_without_content_degrades() {
    let provider = ScriptedProvider::completing(text_analysis_json());
    let pipeline = MessagePipeline::new(provider.clone(), PipelineConfig::default());

    let (_, assistant) = pipeline
        .handle_submission(
            &conversation(),
            MessageSubmission {
                modality: Modality::Text,
                content: None,
                file: None,
            },
        )
        .await
        .unwrap();

    assert!(!assistant.is_processed);
    assert!(assistant.error_message.is_some());
    assert_eq!(assistant.analysis, serde_json::json!({}));
    assert_eq!(provider.call_count(), 0);
}

// ============================================================================
// File-bearing turns
// ============================================================================

#[tokio::test]
async fn test_bpmn_turn_records_file_metadata() {
    let provider = ScriptedProvider::completing(text_analysis_json());
    let pipeline = MessagePipeline::new(provider, PipelineConfig::default());

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("flow.bpmn");
    std::fs::write(
        &path,
        r#"<definitions>
  <process id="p1" name="Reconciliation">
    <task id="t1" name="Load export"/>
    <task id="t2" name="Match"/>
    <exclusiveGateway id="g1" gatewayDirection="Diverging"/>
  </process>
</definitions>"#,
    )
    .unwrap();

    let (user, assistant) = pipeline
        .handle_submission(
            &conversation(),
            MessageSubmission {
                modality: Modality::Bpmn,
                content: None,
                file: Some(path.clone()),
            },
        )
        .await
        .unwrap();

    assert_eq!(user.file_path.as_deref(), Some(path.as_path()));
    assert!(user.file_size.unwrap() > 0);
    assert_eq!(user.file_type.as_deref(), Some("application/xml"));

    assert!(assistant.is_processed);
    assert_eq!(assistant.analysis["type"], "bpmn_analysis");
    assert_eq!(assistant.analysis["total_tasks"], 2);
    assert_eq!(assistant.analysis["total_gateways"], 1);
    assert_eq!(assistant.analysis["complexity"], "low");
    assert!(assistant.content.as_deref().unwrap().contains("2 task(s)"));
}

#[tokio::test]
async fn test_missing_file_turn_degrades() {
    let provider = ScriptedProvider::completing(text_analysis_json());
    let pipeline = MessagePipeline::new(provider, PipelineConfig::default());

    let (_, assistant) = pipeline
        .handle_submission(
            &conversation(),
            MessageSubmission {
                modality: Modality::Pdf,
                content: None,
                file: Some("/nonexistent/intake.pdf".into()),
            },
        )
        .await
        .unwrap();

    assert!(!assistant.is_processed);
    assert!(assistant
        .error_message
        .as_deref()
        .unwrap()
        .contains("not readable"));
}

// ============================================================================
// Registry extension
// ============================================================================

struct CannedWordExtractor;

#[async_trait]
impl Extractor for CannedWordExtractor {
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

#[tokio::test]
async fn test_custom_extractor_replaces_builtin() {
    let provider = ScriptedProvider::completing(text_analysis_json());
    let config = PipelineConfig::default();
    let mut registry = ExtractorRegistry::with_defaults(provider, &config);
    registry.register(Arc::new(CannedWordExtractor));
    let pipeline = MessagePipeline::with_registry(registry, config);

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("notes.docx");
    std::fs::write(&path, b"bytes").unwrap();

    let processed = pipeline
        .process(Modality::Word, &MessagePayload::file(&path))
        .await;

    assert!(processed.is_processed);
    match processed.analysis {
        AnalysisRecord::DocumentStub { modality, .. } => assert_eq!(modality, Modality::Word),
        other => panic!("unexpected record: {:?}", other),
    }
}

#[tokio::test]
async fn test_every_default_modality_reports_its_discriminator_on_failure() {
    // A provider that always fails keeps file modalities from succeeding,
    // but the pipeline boundary must still hold: no panics, failed records.
    let provider = ScriptedProvider::failing(requora_llm::LlmError::NetworkError {
        message: "offline".to_string(),
    });
    let pipeline = MessagePipeline::new(provider, PipelineConfig::default());

    for modality in [Modality::Text, Modality::Pdf, Modality::Audio, Modality::Excel] {
        let processed = pipeline
            .process(modality, &MessagePayload::text("some text"))
            .await;
        assert!(!processed.is_processed, "{} should fail", modality);
        assert!(processed.error_message.is_some());
    }
}
