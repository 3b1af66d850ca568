//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::core::errors::{Result, TranslationError};
use crate::core::models::OutputNaming;

/// Environment variable holding the DeepL authentication key
pub const AUTH_KEY_VAR: &str = "DEEPL_AUTH_KEY";

const FREE_API_ENDPOINT: &str = "https://api-free.deepl.com";
const PRO_API_ENDPOINT: &str = "https://api.deepl.com";

/// Configuration for document translation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    pub api_key: String,
    pub api_endpoint: String,
    pub poll_interval_secs: u64,
    /// Total polling budget, 0 waits forever
    pub timeout_secs: u64,
    pub naming: OutputNaming,
    /// Overrides the input's parent directory for the output file
    pub output_dir: Option<PathBuf>,
    pub request_timeout_ms: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        let api_key = std::env::var(AUTH_KEY_VAR).unwrap_or_default();
        let api_endpoint = std::env::var("DEEPL_API_ENDPOINT")
            .unwrap_or_else(|_| default_endpoint(&api_key).to_string());
        Self {
            api_key,
            api_endpoint,
            poll_interval_secs: 5,
            timeout_secs: 600,
            naming: OutputNaming::Suffix,
            output_dir: None,
            request_timeout_ms: 60000,
        }
    }
}

/// Free-tier keys end in `:fx`
pub fn default_endpoint(api_key: &str) -> &'static str {
    if api_key.trim_end().ends_with(":fx") {
        FREE_API_ENDPOINT
    } else {
        PRO_API_ENDPOINT
    }
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse::<T>()
                .map_err(|e| TranslationError::ConfigError {
                    message: format!("{} has an invalid value '{}': {}", name, raw, e),
                })
        }
        _ => Ok(default),
    }
}

impl TranslatorConfig {
    /// Load configuration from environment variables.
    ///
    /// A missing auth key is not an error here; [`validate`](Self::validate)
    /// rejects it before any request is made.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            poll_interval_secs: env_or("DEEPL_POLL_INTERVAL_SECS", defaults.poll_interval_secs)?,
            timeout_secs: env_or("DEEPL_TIMEOUT_SECS", defaults.timeout_secs)?,
            naming: env_or("DEEPL_OUTPUT_NAMING", defaults.naming)?,
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms)?,
            ..defaults
        };

        debug!(
            "Loaded config: endpoint={}, poll={}s, timeout={}s, naming={}",
            config.api_endpoint, config.poll_interval_secs, config.timeout_secs, config.naming
        );

        Ok(config)
    }

    /// Replace the key, re-deriving the endpoint unless one was set explicitly
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        if std::env::var("DEEPL_API_ENDPOINT").is_err() {
            self.api_endpoint = default_endpoint(&api_key).to_string();
        }
        self.api_key = api_key;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// `None` means poll until the job reaches a terminal state
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(TranslationError::ConfigError {
                message: format!("{} environment variable not set", AUTH_KEY_VAR),
            });
        }

        if self.api_endpoint.is_empty() {
            return Err(TranslationError::ConfigError {
                message: "API endpoint is required".to_string(),
            });
        }

        if self.poll_interval_secs == 0 {
            return Err(TranslationError::ConfigError {
                message: "poll interval must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}
