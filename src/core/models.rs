//! Core data models for document translation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Where the language code goes in the output file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputNaming {
    /// `report.docx_DE`
    #[default]
    Suffix,
    /// `DE_report.docx`
    Prefix,
}

impl fmt::Display for OutputNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputNaming::Suffix => write!(f, "suffix"),
            OutputNaming::Prefix => write!(f, "prefix"),
        }
    }
}

impl FromStr for OutputNaming {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "suffix" => Ok(OutputNaming::Suffix),
            "prefix" => Ok(OutputNaming::Prefix),
            other => Err(format!("unknown output naming '{}', expected suffix or prefix", other)),
        }
    }
}

/// Job state as seen by the poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    /// Queued or translating
    Pending,
    Done,
    Error,
}

impl JobState {
    /// Done and Error end the poll loop
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Pending)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Pending => write!(f, "pending"),
            JobState::Done => write!(f, "done"),
            JobState::Error => write!(f, "error"),
        }
    }
}

/// Handle to a document job owned by the remote service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentHandle {
    pub document_id: String,
    pub document_key: String,
    /// Where the translated document will be written
    pub output: PathBuf,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

impl DocumentHandle {
    pub fn new(
        document_id: impl Into<String>,
        document_key: impl Into<String>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            document_key: document_key.into(),
            output: output.into(),
            submitted_at: chrono::Utc::now(),
        }
    }
}

/// One status reading for a document job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStatus {
    pub state: JobState,
    /// Only meaningful once done
    pub billed_characters: Option<u64>,
    pub seconds_remaining: Option<u64>,
    /// Only meaningful on error
    pub error_message: Option<String>,
}

impl DocumentStatus {
    pub fn pending() -> Self {
        Self {
            state: JobState::Pending,
            billed_characters: None,
            seconds_remaining: None,
            error_message: None,
        }
    }

    pub fn done(billed_characters: Option<u64>) -> Self {
        Self {
            state: JobState::Done,
            billed_characters,
            ..Self::pending()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            state: JobState::Error,
            error_message: Some(message.into()),
            ..Self::pending()
        }
    }

    pub fn with_seconds_remaining(mut self, seconds: u64) -> Self {
        self.seconds_remaining = Some(seconds);
        self
    }
}

/// Result of a finished translation
#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    pub document_id: String,
    pub output: PathBuf,
    pub billed_characters: Option<u64>,
    pub elapsed: Duration,
    pub polls: u32,
}
