//! Scripted document service for tests
//!
//! Plays back a fixed sequence of statuses without touching the network. The
//! last status repeats once the script runs out, so `vec![pending()]` never
//! finishes.
//!
//! ```ignore
//! let service = MockService::finishing_after(2, DocumentStatus::done(Some(1234)));
//! let processor = DocumentProcessor::new(service, config);
//! ```

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use crate::core::client::DocumentService;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{DocumentHandle, DocumentStatus};

/// Content the mock writes on download
pub const MOCK_TRANSLATION: &[u8] = b"translated by mock";

/// Document service that replays a status script
#[derive(Debug, Default)]
pub struct MockService {
    script: Mutex<Vec<DocumentStatus>>,
    submit_error: Option<String>,
    submit_calls: AtomicU32,
    status_calls: AtomicU32,
    download_calls: AtomicU32,
}

impl MockService {
    /// Replay `script` in order
    pub fn new(script: Vec<DocumentStatus>) -> Self {
        Self {
            script: Mutex::new(script),
            ..Default::default()
        }
    }

    /// `pending_polls` pending readings, then `terminal`
    pub fn finishing_after(pending_polls: usize, terminal: DocumentStatus) -> Self {
        let mut script = vec![DocumentStatus::pending(); pending_polls];
        script.push(terminal);
        Self::new(script)
    }

    /// Never leaves pending
    pub fn never_finishing() -> Self {
        Self::new(vec![DocumentStatus::pending()])
    }

    /// Fail the upload with a network error
    pub fn failing_submit(message: impl Into<String>) -> Self {
        Self {
            submit_error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> u32 {
        self.download_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentService for MockService {
    async fn submit(
        &self,
        _input: &Path,
        output: &Path,
        _source_lang: Option<&str>,
        target_lang: &str,
    ) -> Result<DocumentHandle> {
        let n = self.submit_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(message) = &self.submit_error {
            return Err(TranslationError::NetworkError {
                message: message.clone(),
            });
        }
        Ok(DocumentHandle::new(
            format!("MOCK-{}-{}", target_lang.to_uppercase(), n),
            "mock-key",
            output,
        ))
    }

    async fn status(&self, _handle: &DocumentHandle) -> Result<DocumentStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self
            .script
            .lock()
            .map_err(|_| TranslationError::InvalidResponseError {
                message: "mock script poisoned".to_string(),
            })?;
        match script.len() {
            0 => Err(TranslationError::InvalidResponseError {
                message: "mock script is empty".to_string(),
            }),
            1 => Ok(script[0].clone()),
            _ => Ok(script.remove(0)),
        }
    }

    async fn download(&self, handle: &DocumentHandle) -> Result<()> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        tokio::fs::write(&handle.output, MOCK_TRANSLATION).await?;
        Ok(())
    }
}
