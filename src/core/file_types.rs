//! Supported document types
//!
//! The allow-list below decides which inputs are accepted, regardless of what
//! the remote service would take.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::core::errors::{Result, TranslationError};

/// Extension (lowercase, no dot) to display name
const SUPPORTED_EXTENSIONS: &[(&str, &str)] = &[
    ("docx", "Microsoft Word Document"),
    ("doc", "Microsoft Word Document"),
    ("pptx", "Microsoft PowerPoint Document"),
    ("xlsx", "Microsoft Excel Document"),
    ("pdf", "Portable Document Format"),
    ("htm", "HTML Document"),
    ("html", "HTML Document"),
    ("txt", "Plain Text Document"),
    ("xlf", "XLIFF Document, version 2.1"),
    ("xliff", "XLIFF Document, version 2.1"),
    ("srt", "SubRip Subtitle file"),
];

fn table() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| SUPPORTED_EXTENSIONS.iter().copied().collect())
}

/// A classified input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileType {
    /// Extension as it appears in the path
    pub extension: String,
    /// Lowercased lookup key
    pub key: String,
    /// Human-readable type name
    pub label: &'static str,
}

/// Extract the text after the last `.` of the file name in `path`.
///
/// Only the last path segment counts. The dot must be neither its first nor
/// its last character, so `.gitignore` and `file.` have no extension.
pub fn extract_extension(path: &str) -> Option<&str> {
    let name = path
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(path);
    let i = name.rfind('.')?;
    if i > 0 && i < name.len() - 1 {
        Some(&name[i + 1..])
    } else {
        None
    }
}

/// Case-insensitive label lookup
pub fn lookup(extension: &str) -> Option<&'static str> {
    table().get(extension.to_lowercase().as_str()).copied()
}

/// Classify `path` against the allow-list
pub fn classify(path: &str) -> Result<FileType> {
    let extension = extract_extension(path).ok_or_else(|| TranslationError::NoExtension {
        path: path.to_string(),
    })?;

    let key = extension.to_lowercase();
    let label = lookup(&key).ok_or_else(|| TranslationError::UnsupportedExtension {
        extension: extension.to_string(),
    })?;

    Ok(FileType {
        extension: extension.to_string(),
        key,
        label,
    })
}

/// All supported extensions with their labels, sorted by extension
pub fn supported_extensions() -> Vec<(&'static str, &'static str)> {
    let mut entries = SUPPORTED_EXTENSIONS.to_vec();
    entries.sort_by_key(|(ext, _)| *ext);
    entries
}
