//! Main entry point for the DeepL document translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deepl_doc_translator::cli::commands;
use deepl_doc_translator::core::config::TranslatorConfig;
use deepl_doc_translator::core::models::OutputNaming;

/// Translate a document with DeepL and write the result next to it
#[derive(Parser, Debug)]
#[command(name = "deepl-doc-translator", version, about, long_about = None)]
#[command(after_help = "Example: deepl-doc-translator input.docx DE\n\
Output file will be auto-generated (e.g., input.docx_DE).\n\
Ensure DEEPL_AUTH_KEY environment variable is set.")]
struct Args {
    /// Document to translate
    #[arg(required_unless_present = "list_types")]
    input_file: Option<PathBuf>,

    /// Target language code (e.g. DE, EN-GB)
    #[arg(required_unless_present_any = ["check", "list_types"])]
    target_lang: Option<String>,

    /// Source language (auto-detect if not specified)
    #[arg(long)]
    source_lang: Option<String>,

    /// Put the language code before or after the file name (suffix, prefix)
    #[arg(long)]
    naming: Option<OutputNaming>,

    /// Write the translated file here instead of next to the input
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Seconds between status checks
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Give up after this many seconds, 0 waits forever
    #[arg(long)]
    timeout: Option<u64>,

    /// DeepL API key (optional, defaults to DEEPL_AUTH_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Only check that the file type is supported
    #[arg(long)]
    check: bool,

    /// List supported file types and exit
    #[arg(long)]
    list_types: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Layer command line overrides on top of the environment config
    fn apply(&self, mut config: TranslatorConfig) -> TranslatorConfig {
        if let Some(api_key) = &self.api_key {
            config = config.with_api_key(api_key.clone());
        }
        if let Some(naming) = self.naming {
            config.naming = naming;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }
        if let Some(secs) = self.poll_interval {
            config.poll_interval_secs = secs;
        }
        if let Some(secs) = self.timeout {
            config.timeout_secs = secs;
        }
        config
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}={}", env!("CARGO_CRATE_NAME"), log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if args.list_types {
        commands::handle_list_types();
        return Ok(());
    }

    let Some(file) = args.input_file.as_deref() else {
        anyhow::bail!("an input file is required");
    };

    if args.check {
        commands::handle_check(file)?;
        return Ok(());
    }

    let Some(target_lang) = args.target_lang.as_deref() else {
        anyhow::bail!("a target language is required");
    };

    commands::handle_translate(file, target_lang, args.source_lang.as_deref(), || {
        Ok(args.apply(TranslatorConfig::from_env()?))
    })
    .await?;

    Ok(())
}
