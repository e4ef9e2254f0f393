//! Client for the external summarization service.
//!
//! The service takes a multipart form (`file`, `style`, `language`) and
//! answers with JSON. On success the body is returned to our caller as-is,
//! so the raw value is kept next to the few fields we persist.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{Language, SummaryStyle};

#[derive(Debug, Clone)]
pub struct SummarizeJob {
    pub file_name: String,
    pub content: Vec<u8>,
    pub style: SummaryStyle,
    pub language: Language,
}

/// The part of the service's response that gets persisted.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ExternalSummary {
    pub style: String,
    pub language: String,
    pub summary: SummaryBody,
    pub process_info: ProcessInfo,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SummaryBody {
    pub main_summary: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProcessInfo {
    pub processing_time_seconds: f64,
}

#[derive(Debug, Clone)]
pub struct SummaryPayload {
    pub raw: Value,
    pub parsed: ExternalSummary,
}

impl SummaryPayload {
    pub fn from_value(raw: Value) -> AppResult<Self> {
        let parsed = serde_json::from_value(raw.clone())
            .map_err(|e| AppError::internal(format!("Failed to parse response: {}", e)))?;
        Ok(Self { raw, parsed })
    }

    /// Style reported by the service, or `fallback` when it is not one we know.
    pub fn style_or(&self, fallback: SummaryStyle) -> SummaryStyle {
        self.parsed.style.parse().unwrap_or(fallback)
    }

    pub fn language_or(&self, fallback: Language) -> Language {
        self.parsed.language.parse().unwrap_or(fallback)
    }
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, job: SummarizeJob) -> AppResult<SummaryPayload>;
}

pub struct HttpSummarizer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSummarizer {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    async fn summarize(&self, job: SummarizeJob) -> AppResult<SummaryPayload> {
        let size = job.content.len();
        let file_part = Part::bytes(job.content)
            .file_name(job.file_name.clone())
            .mime_str("application/pdf")?;

        let form = Form::new()
            .part("file", file_part)
            .text("style", job.style.as_str())
            .text("language", job.language.as_str());

        info!(
            endpoint = %self.endpoint,
            file_name = %job.file_name,
            file_size = size,
            style = %job.style,
            language = %job.language,
            "Requesting summary"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = %status, body = %body, "Summarization service returned an error");
            return Err(AppError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| AppError::internal(format!("Failed to parse response: {}", e)))?;

        SummaryPayload::from_value(raw)
    }
}
