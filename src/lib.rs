//! DeepL document translator
//!
//! Checks a document's type against a fixed allow-list, submits it to the
//! DeepL document API and polls until the translated file can be fetched.

#![forbid(unsafe_code)]

pub mod core;
pub mod processors;
pub mod cli;

// Re-export key types for convenience
pub use crate::core::{
    client::{DeepLClient, DocumentService},
    config::TranslatorConfig,
    errors::{Result, TranslationError},
    file_types::{classify, FileType},
    models::{DocumentHandle, DocumentStatus, JobState, OutputNaming, TranslationOutcome},
};

pub use crate::processors::document::{derive_output_path, DocumentProcessor};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
