//! Custom error types for document translation

use thiserror::Error;

/// Document translation errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Input path has no usable extension
    #[error("No extension found for input file: {path}")]
    NoExtension {
        path: String,
    },

    /// Extension is not in the supported list
    #[error("Unsupported file extension '{extension}'")]
    UnsupportedExtension {
        extension: String,
    },

    /// API request failed
    #[error("API error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded. Retry after {retry_after:?} seconds")]
    RateLimitError {
        retry_after: Option<u64>,
    },

    /// Character quota exceeded
    #[error("Character quota exceeded for this billing period")]
    QuotaExceededError,

    /// Network error
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
    },

    /// Invalid response from API
    #[error("Invalid response: {message}")]
    InvalidResponseError {
        message: String,
    },

    /// The service reported the job as failed
    #[error("Error during translation: {message}")]
    DocumentFailed {
        message: String,
    },

    /// Polling budget ran out before the job finished
    #[error("Translation timed out after {seconds} seconds")]
    Timeout {
        seconds: u64,
    },

    /// File operation error
    #[error("File error: {path} - {message}")]
    FileError {
        path: String,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
