//! End-to-end tests against the scripted document service

use std::path::Path;

use deepl_doc_translator::cli::commands::handle_check;
use deepl_doc_translator::core::mock::{MockService, MOCK_TRANSLATION};
use deepl_doc_translator::{
    classify, DocumentProcessor, DocumentStatus, OutputNaming, TranslationError,
    TranslatorConfig,
};

fn config() -> TranslatorConfig {
    TranslatorConfig {
        api_key: "integration-key:fx".to_string(),
        api_endpoint: "http://localhost".to_string(),
        poll_interval_secs: 5,
        timeout_secs: 600,
        naming: OutputNaming::Suffix,
        output_dir: None,
        request_timeout_ms: 1000,
    }
}

#[test]
fn test_check_reports_type() {
    let file_type = handle_check(Path::new("minutes.HTML")).unwrap();
    assert_eq!(file_type.label, "HTML Document");

    let err = handle_check(Path::new("bundle.zip")).unwrap_err();
    assert!(err.to_string().contains("Unsupported file extension 'zip'"));
}

#[test]
fn test_classifier_gate() {
    assert!(matches!(
        classify("README"),
        Err(TranslationError::NoExtension { .. })
    ));
    assert_eq!(classify("deck.pptx").unwrap().label, "Microsoft PowerPoint Document");
}

#[tokio::test(start_paused = true)]
async fn test_report_docx_to_german() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("report.docx");
    std::fs::write(&input, b"quarterly numbers").unwrap();

    let processor = DocumentProcessor::new(
        MockService::finishing_after(3, DocumentStatus::done(Some(1234)).with_seconds_remaining(0)),
        config(),
    );

    let outcome = processor.translate_document(&input, "de", None).await.unwrap();

    assert_eq!(outcome.output, dir.path().join("report.docx_DE"));
    assert_eq!(outcome.billed_characters, Some(1234));
    assert_eq!(outcome.polls, 4);
    assert!(outcome.document_id.starts_with("MOCK-DE"));
    assert_eq!(std::fs::read(&outcome.output).unwrap(), MOCK_TRANSLATION);
}

#[tokio::test(start_paused = true)]
async fn test_step_by_step_flow() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("subs.srt");
    std::fs::write(&input, b"1\n00:00:01,000 --> 00:00:02,000\nHello\n").unwrap();

    let processor = DocumentProcessor::new(
        MockService::finishing_after(0, DocumentStatus::done(None)),
        TranslatorConfig {
            naming: OutputNaming::Prefix,
            ..config()
        },
    );

    let output = processor.prepare(&input, "pt-br").await.unwrap();
    assert_eq!(output, dir.path().join("PT-BR_subs.srt"));

    let handle = processor.submit(&input, &output, Some("en"), "pt-br").await.unwrap();
    assert_eq!(handle.output, output);

    let outcome = processor.wait_for_result(&handle).await.unwrap();
    assert_eq!(outcome.billed_characters, None);
    assert_eq!(outcome.polls, 1);
    assert!(output.exists());
}

#[tokio::test(start_paused = true)]
async fn test_failed_job_is_not_retried() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("book.pdf");
    std::fs::write(&input, b"%PDF").unwrap();

    let processor = DocumentProcessor::new(
        MockService::finishing_after(2, DocumentStatus::error("quota exceeded")),
        config(),
    );

    let err = processor.translate_document(&input, "ja", None).await.unwrap_err();
    assert_eq!(err.to_string(), "Error during translation: quota exceeded");
    assert_eq!(processor.service().submit_calls(), 1);
    assert_eq!(processor.service().status_calls(), 3);
}
