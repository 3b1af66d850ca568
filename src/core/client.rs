//! Document translation service boundary and the DeepL HTTP client

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{DocumentHandle, DocumentStatus, JobState};

/// Remote service that translates whole documents asynchronously
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Upload `input` and start a job; the result will later be written to `output`
    async fn submit(
        &self,
        input: &Path,
        output: &Path,
        source_lang: Option<&str>,
        target_lang: &str,
    ) -> Result<DocumentHandle>;

    /// Read the current job status
    async fn status(&self, handle: &DocumentHandle) -> Result<DocumentStatus>;

    /// Fetch the translated document into `handle.output`. Only valid once done.
    async fn download(&self, handle: &DocumentHandle) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    document_id: String,
    document_key: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    seconds_remaining: Option<u64>,
    billed_characters: Option<u64>,
    #[serde(alias = "message")]
    error_message: Option<String>,
}

impl StatusResponse {
    fn into_status(self) -> Result<DocumentStatus> {
        let state = match self.status.as_str() {
            "queued" | "translating" => JobState::Pending,
            "done" => JobState::Done,
            "error" => JobState::Error,
            other => {
                return Err(TranslationError::InvalidResponseError {
                    message: format!("unknown document status '{}'", other),
                })
            }
        };

        let error_message = match state {
            JobState::Error => Some(
                self.error_message
                    .unwrap_or_else(|| "unknown error".to_string()),
            ),
            _ => None,
        };

        Ok(DocumentStatus {
            state,
            billed_characters: self.billed_characters,
            seconds_remaining: self.seconds_remaining,
            error_message,
        })
    }
}

fn parse_upload(body: &str) -> Result<UploadResponse> {
    Ok(serde_json::from_str(body)?)
}

fn parse_status(body: &str) -> Result<DocumentStatus> {
    serde_json::from_str::<StatusResponse>(body)?.into_status()
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// DeepL document API client
#[derive(Debug, Clone)]
pub struct DeepLClient {
    client: reqwest::Client,
    api_key: String,
    api_endpoint: String,
}

impl DeepLClient {
    /// Create a new client
    pub fn new(config: &TranslatorConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_endpoint: config.api_endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_endpoint, path)
    }

    fn auth_header(&self) -> String {
        format!("DeepL-Auth-Key {}", self.api_key)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let error_text = response.text().await.unwrap_or_default();

        Err(map_error(status_code, retry_after, &error_text))
    }
}

fn map_error(status_code: u16, retry_after: Option<u64>, body: &str) -> TranslationError {
    match status_code {
        429 => TranslationError::RateLimitError { retry_after },
        456 => TranslationError::QuotaExceededError,
        _ => {
            let message = serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| body.to_string());
            TranslationError::ApiError {
                status: status_code,
                message,
            }
        }
    }
}

#[async_trait]
impl DocumentService for DeepLClient {
    async fn submit(
        &self,
        input: &Path,
        output: &Path,
        source_lang: Option<&str>,
        target_lang: &str,
    ) -> Result<DocumentHandle> {
        let bytes = tokio::fs::read(input)
            .await
            .map_err(|e| TranslationError::FileError {
                path: input.display().to_string(),
                message: e.to_string(),
            })?;

        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        debug!("Uploading {} ({} bytes)", file_name, bytes.len());

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let mut form = reqwest::multipart::Form::new()
            .text("target_lang", target_lang.to_uppercase())
            .part("file", part);
        if let Some(source_lang) = source_lang {
            form = form.text("source_lang", source_lang.to_uppercase());
        }

        let response = self
            .send(self.client.post(self.url("/v2/document")).multipart(form))
            .await?;

        let upload = parse_upload(&response.text().await?)?;

        info!("Document uploaded, id {}", upload.document_id);

        Ok(DocumentHandle::new(
            upload.document_id,
            upload.document_key,
            output,
        ))
    }

    async fn status(&self, handle: &DocumentHandle) -> Result<DocumentStatus> {
        let url = self.url(&format!("/v2/document/{}", handle.document_id));
        let response = self
            .send(
                self.client
                    .post(url)
                    .form(&[("document_key", handle.document_key.as_str())]),
            )
            .await?;

        parse_status(&response.text().await?)
    }

    async fn download(&self, handle: &DocumentHandle) -> Result<()> {
        let url = self.url(&format!("/v2/document/{}/result", handle.document_id));
        let response = self
            .send(
                self.client
                    .post(url)
                    .form(&[("document_key", handle.document_key.as_str())]),
            )
            .await?;

        let bytes = response.bytes().await?;
        tokio::fs::write(&handle.output, &bytes)
            .await
            .map_err(|e| TranslationError::FileError {
                path: handle.output.display().to_string(),
                message: e.to_string(),
            })?;

        debug!("Wrote {} bytes to {}", bytes.len(), handle.output.display());
        Ok(())
    }
}
