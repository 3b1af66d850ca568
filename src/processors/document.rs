//! Single-document translation driver
//!
//! Derives the output path, submits the document and polls the service at a
//! fixed interval until the job is done, failed or out of time.

use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::core::client::{DeepLClient, DocumentService};
use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{DocumentHandle, DocumentStatus, JobState, OutputNaming, TranslationOutcome};

/// Build the output path for `input`.
///
/// The uppercased language code is appended to (`report.docx_DE`) or put in
/// front of (`DE_report.docx`) the full file name. The file lands in
/// `output_dir` when given, otherwise next to the input.
pub fn derive_output_path(
    input: &Path,
    target_lang: &str,
    naming: OutputNaming,
    output_dir: Option<&Path>,
) -> Result<PathBuf> {
    let file_name = input
        .file_name()
        .ok_or_else(|| TranslationError::FileError {
            path: input.display().to_string(),
            message: "Input path has no file name".to_string(),
        })?
        .to_string_lossy();

    let lang = target_lang.trim().to_uppercase();
    let new_name = match naming {
        OutputNaming::Suffix => format!("{}_{}", file_name, lang),
        OutputNaming::Prefix => format!("{}_{}", lang, file_name),
    };

    Ok(match output_dir {
        Some(dir) => dir.join(new_name),
        None => input.with_file_name(new_name),
    })
}

/// Create the parent directory of `output` when missing
pub async fn prepare_output_dir(output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating output directory {}", parent.display());
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TranslationError::FileError {
                    path: parent.display().to_string(),
                    message: format!("Could not create output directory: {}", e),
                })?;
        }
    }
    Ok(())
}

/// Drives one document through a [`DocumentService`]
pub struct DocumentProcessor<S> {
    service: S,
    config: TranslatorConfig,
    progress: ProgressBar,
}

impl DocumentProcessor<DeepLClient> {
    /// Create a processor backed by the DeepL API
    pub fn from_config(config: TranslatorConfig) -> Result<Self> {
        let client = DeepLClient::new(&config)?;
        Ok(Self::new(client, config))
    }
}

impl<S: DocumentService> DocumentProcessor<S> {
    /// Create a new document processor
    pub fn new(service: S, config: TranslatorConfig) -> Self {
        Self {
            service,
            config,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report poll progress on `progress`
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Output path for `input` under the current configuration
    pub fn output_path(&self, input: &Path, target_lang: &str) -> Result<PathBuf> {
        derive_output_path(
            input,
            target_lang,
            self.config.naming,
            self.config.output_dir.as_deref(),
        )
    }

    /// Derive the output path, check credentials and create the output directory
    pub async fn prepare(&self, input: &Path, target_lang: &str) -> Result<PathBuf> {
        let output = self.output_path(input, target_lang)?;
        self.config.validate()?;
        prepare_output_dir(&output).await?;
        Ok(output)
    }

    /// Upload the document and start the job
    pub async fn submit(
        &self,
        input: &Path,
        output: &Path,
        source_lang: Option<&str>,
        target_lang: &str,
    ) -> Result<DocumentHandle> {
        info!(
            "Submitting {} -> {} ({})",
            input.display(),
            output.display(),
            target_lang
        );
        self.service
            .submit(input, output, source_lang, target_lang)
            .await
    }

    /// Poll until the job reaches a terminal state or the budget runs out.
    ///
    /// Returns the terminal status and how many times the service was asked.
    pub async fn poll_until_complete(&self, handle: &DocumentHandle) -> Result<(DocumentStatus, u32)> {
        let interval = self.config.poll_interval();
        let timeout = self.config.timeout();
        let start = Instant::now();
        let mut polls = 0u32;

        loop {
            let status = self.service.status(handle).await?;
            polls += 1;
            debug!(
                "Poll {} for {}: {} (remaining {:?})",
                polls, handle.document_id, status.state, status.seconds_remaining
            );

            if status.state.is_terminal() {
                return Ok((status, polls));
            }

            self.progress.set_message(match status.seconds_remaining {
                Some(secs) => format!("Translating... about {}s remaining", secs),
                None => "Translating...".to_string(),
            });
            self.progress.tick();

            if let Some(timeout) = timeout {
                if start.elapsed() > timeout {
                    warn!(
                        "Gave up on {} after {} polls",
                        handle.document_id, polls
                    );
                    return Err(TranslationError::Timeout {
                        seconds: timeout.as_secs(),
                    });
                }
            }

            sleep(interval).await;
        }
    }

    /// Wait for the job and fetch the translated document once done
    pub async fn wait_for_result(&self, handle: &DocumentHandle) -> Result<TranslationOutcome> {
        let start = Instant::now();
        let (status, polls) = self.poll_until_complete(handle).await?;

        match status.state {
            JobState::Done => {
                self.service.download(handle).await?;
                info!(
                    "Document {} done after {} polls, written to {}",
                    handle.document_id,
                    polls,
                    handle.output.display()
                );
                Ok(TranslationOutcome {
                    document_id: handle.document_id.clone(),
                    output: handle.output.clone(),
                    billed_characters: status.billed_characters,
                    elapsed: start.elapsed(),
                    polls,
                })
            }
            _ => Err(TranslationError::DocumentFailed {
                message: status
                    .error_message
                    .unwrap_or_else(|| "unknown error".to_string()),
            }),
        }
    }

    /// Translate `input` end to end
    pub async fn translate_document(
        &self,
        input: &Path,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> Result<TranslationOutcome> {
        let output = self.prepare(input, target_lang).await?;
        let handle = self.submit(input, &output, source_lang, target_lang).await?;
        self.wait_for_result(&handle).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mock::{MockService, MOCK_TRANSLATION};
    use std::time::Duration;

    fn test_config() -> TranslatorConfig {
        TranslatorConfig {
            api_key: "test_key".to_string(),
            api_endpoint: "http://localhost".to_string(),
            poll_interval_secs: 5,
            timeout_secs: 600,
            naming: OutputNaming::Suffix,
            output_dir: None,
            request_timeout_ms: 1000,
        }
    }

    #[test]
    fn test_derive_suffix() {
        let out = derive_output_path(Path::new("docs/report.docx"), "de", OutputNaming::Suffix, None)
            .unwrap();
        assert_eq!(out, Path::new("docs").join("report.docx_DE"));
    }

    #[test]
    fn test_derive_prefix() {
        let out = derive_output_path(Path::new("docs/report.docx"), "de", OutputNaming::Prefix, None)
            .unwrap();
        assert_eq!(out, Path::new("docs").join("DE_report.docx"));
    }

    #[test]
    fn test_derive_bare_name_stays_relative() {
        let out = derive_output_path(Path::new("report.docx"), "en-gb", OutputNaming::Suffix, None)
            .unwrap();
        assert_eq!(out, PathBuf::from("report.docx_EN-GB"));
    }

    #[test]
    fn test_derive_output_dir_override() {
        let out = derive_output_path(
            Path::new("in/report.pdf"),
            "fr",
            OutputNaming::Suffix,
            Some(Path::new("out/fr")),
        )
        .unwrap();
        assert_eq!(out, Path::new("out/fr").join("report.pdf_FR"));
    }

    #[test]
    fn test_derive_is_deterministic() {
        let a = derive_output_path(Path::new("a/b.txt"), "ja", OutputNaming::Prefix, None).unwrap();
        let b = derive_output_path(Path::new("a/b.txt"), "ja", OutputNaming::Prefix, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_derive_without_file_name() {
        assert!(matches!(
            derive_output_path(Path::new(".."), "de", OutputNaming::Suffix, None),
            Err(TranslationError::FileError { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_key_never_calls_service() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("report.docx");
        std::fs::write(&input, b"hello").unwrap();

        let config = TranslatorConfig {
            api_key: String::new(),
            ..test_config()
        };
        let processor = DocumentProcessor::new(
            MockService::finishing_after(0, DocumentStatus::done(None)),
            config,
        );

        let err = processor.translate_document(&input, "de", None).await.unwrap_err();
        assert!(matches!(err, TranslationError::ConfigError { .. }));
        assert_eq!(processor.service().submit_calls(), 0);
        assert_eq!(processor.service().status_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_after_polls() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("report.docx");
        std::fs::write(&input, b"hello").unwrap();

        let processor = DocumentProcessor::new(
            MockService::finishing_after(2, DocumentStatus::done(Some(1234))),
            test_config(),
        );

        let outcome = processor.translate_document(&input, "de", None).await.unwrap();
        assert_eq!(outcome.billed_characters, Some(1234));
        assert_eq!(outcome.polls, 3);
        assert_eq!(outcome.output, dir.path().join("report.docx_DE"));
        assert!(outcome.elapsed >= Duration::from_secs(10));
        assert_eq!(std::fs::read(&outcome.output).unwrap(), MOCK_TRANSLATION);
        assert_eq!(processor.service().download_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_status_reports_message_without_retry() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("slides.pptx");
        std::fs::write(&input, b"hello").unwrap();

        let processor = DocumentProcessor::new(
            MockService::finishing_after(1, DocumentStatus::error("quota exceeded")),
            test_config(),
        );

        let err = processor.translate_document(&input, "fr", None).await.unwrap_err();
        match &err {
            TranslationError::DocumentFailed { message } => assert_eq!(message, "quota exceeded"),
            other => panic!("expected DocumentFailed, got {other:?}"),
        }
        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(processor.service().submit_calls(), 1);
        assert_eq!(processor.service().status_calls(), 2);
        assert_eq!(processor.service().download_calls(), 0);
        assert!(!dir.path().join("slides.pptx_FR").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_times_out() {
        let config = TranslatorConfig {
            poll_interval_secs: 5,
            timeout_secs: 60,
            ..test_config()
        };
        let processor = DocumentProcessor::new(MockService::never_finishing(), config);
        let handle = DocumentHandle::new("D1", "K1", "out.txt_DE");

        let err = processor.poll_until_complete(&handle).await.unwrap_err();
        assert!(matches!(err, TranslationError::Timeout { seconds: 60 }));
        // Polls at t=0, 5, ..., 65; the one at t=60 is still within budget
        assert_eq!(processor.service().status_calls(), 14);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_timeout_keeps_polling() {
        let config = TranslatorConfig {
            timeout_secs: 0,
            ..test_config()
        };
        let processor = DocumentProcessor::new(
            MockService::finishing_after(300, DocumentStatus::done(None)),
            config,
        );
        let handle = DocumentHandle::new("D1", "K1", "out.txt_DE");

        let (status, polls) = processor.poll_until_complete(&handle).await.unwrap();
        assert_eq!(status.state, JobState::Done);
        assert_eq!(polls, 301);
    }

    #[tokio::test]
    async fn test_submit_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.txt");
        std::fs::write(&input, b"hello").unwrap();

        let processor = DocumentProcessor::new(MockService::failing_submit("connection reset"), test_config());
        let err = processor.translate_document(&input, "de", None).await.unwrap_err();
        assert!(matches!(err, TranslationError::NetworkError { .. }));
        assert_eq!(processor.service().status_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_output_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        std::fs::write(&input, b"hello").unwrap();
        let out_dir = dir.path().join("nested/deeper");

        let config = TranslatorConfig {
            output_dir: Some(out_dir.clone()),
            naming: OutputNaming::Prefix,
            ..test_config()
        };
        let processor = DocumentProcessor::new(
            MockService::finishing_after(0, DocumentStatus::done(Some(5))),
            config,
        );

        let outcome = processor.translate_document(&input, "es", None).await.unwrap();
        assert!(out_dir.is_dir());
        assert_eq!(outcome.output, out_dir.join("ES_notes.txt"));
        assert!(outcome.output.exists());
    }
}
