//! CLI command handlers

use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::core::config::TranslatorConfig;
use crate::core::errors::Result;
use crate::core::file_types::{self, FileType};
use crate::processors::document::DocumentProcessor;

/// Print every supported extension with its type name
pub fn handle_list_types() {
    println!("Supported file types:");
    for (ext, label) in file_types::supported_extensions() {
        println!("   .{:<6} {}", ext, label);
    }
}

/// Classify the input and report its type
pub fn handle_check(file: &Path) -> anyhow::Result<FileType> {
    let file_type = file_types::classify(&file.to_string_lossy())?;
    println!("File type: {}", file_type.label);
    Ok(file_type)
}

/// Absolute form of `path` for report lines, falling back to the path as given
pub fn absolute_display(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Handle document translation.
///
/// The file type is checked before `load_config` runs, so a bad extension is
/// reported even when the environment is misconfigured.
pub async fn handle_translate<F>(
    file: &Path,
    target_lang: &str,
    source_lang: Option<&str>,
    load_config: F,
) -> anyhow::Result<()>
where
    F: FnOnce() -> anyhow::Result<TranslatorConfig>,
{
    handle_check(file)?;
    let config = load_config()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);

    let processor = DocumentProcessor::from_config(config)?.with_progress(spinner.clone());
    let output = processor.prepare(file, target_lang).await?;

    println!("Starting document translation...");
    println!("Input file: {}", absolute_display(file).display());
    println!("Output file: {}", absolute_display(&output).display());
    println!("Target language: {}", target_lang);

    let result: Result<_> = async {
        let handle = processor
            .submit(file, &output, source_lang, target_lang)
            .await?;
        println!(
            "Document translation initiated. Document ID: {}",
            handle.document_id
        );
        println!("Waiting for translation to complete...");

        spinner.enable_steady_tick(Duration::from_millis(120));
        processor.wait_for_result(&handle).await
    }
    .await;
    spinner.finish_and_clear();

    let outcome = result?;
    info!(
        "Translation of {} finished in {:?} after {} polls",
        outcome.document_id, outcome.elapsed, outcome.polls
    );

    println!("Translation completed successfully.");
    if let Some(billed) = outcome.billed_characters {
        println!("Billed characters: {}", billed);
    }
    println!("   Output: {}", outcome.output.display());
    println!("   Time: {:?}", outcome.elapsed);

    Ok(())
}
