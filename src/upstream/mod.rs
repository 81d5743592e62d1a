//! HTTP client for the upstream config service.
//!
//! The service validates YAML configs and opens pull requests for accepted
//! changes.  All requests are form-encoded; responses are JSON.  Validation
//! failures come back as reports, not HTTP errors, so the client maps status
//! codes and bodies into [`ValidationOutcome`] rather than bailing on non-2xx.

pub mod model;
pub mod precheck;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::session::EditorType;
use model::{ResultType, SubmitResponse, ValidationOutcome, ValidationReport};

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("cannot reach the config service: {0}")]
    Unreachable(#[from] reqwest::Error),
    #[error("config service rejected the request ({status}): {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("config service sent a malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

/// Fields of a config submission, shared by the add and update paths.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub filename: String,
    pub commit_msg: String,
    pub long_msg: String,
    pub draft: bool,
    pub code: String,
    pub editor_type: EditorType,
}

impl UpstreamClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build upstream HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Validate a document.  The service answers 200 with a report body for
    /// findings as well as for clean documents, so the body decides.
    pub async fn validate(
        &self,
        code: &str,
        editor_type: EditorType,
    ) -> Result<ValidationOutcome, UpstreamError> {
        let url = format!("{}/validate", self.base_url);
        let response = self
            .http
            .post(&url)
            .form(&[("code", code), ("editor_type", editor_type.as_str())])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, editor_type = editor_type.as_str(), "validation response");

        match serde_json::from_str::<ValidationReport>(&body) {
            Ok(mut report) => {
                if report.result_type.is_none() && !status.is_success() {
                    report.result_type = Some(ResultType::Error);
                }
                Ok(ValidationOutcome::Report(report))
            }
            Err(_) if status.is_success() => Ok(ValidationOutcome::Valid),
            Err(_) => Ok(ValidationOutcome::Report(ValidationReport {
                result_type: Some(ResultType::Error),
                line_number: None,
                summary: "Validation failed".to_string(),
                details: Some(body),
            })),
        }
    }

    /// Open a pull request adding a new config file.
    pub async fn add_config(&self, req: &SubmitRequest) -> Result<SubmitResponse, UpstreamError> {
        self.submit("add_config", req).await
    }

    /// Open a pull request updating an existing config file.
    pub async fn update_config(
        &self,
        req: &SubmitRequest,
    ) -> Result<SubmitResponse, UpstreamError> {
        self.submit("update_config", req).await
    }

    async fn submit(
        &self,
        path: &str,
        req: &SubmitRequest,
    ) -> Result<SubmitResponse, UpstreamError> {
        let url = format!("{}/{path}", self.base_url);
        let draft = if req.draft { "true" } else { "false" };
        let response = self
            .http
            .post(&url)
            .form(&[
                ("filename", req.filename.as_str()),
                ("commit_msg", req.commit_msg.as_str()),
                ("long_msg", req.long_msg.as_str()),
                ("draft", draft),
                ("code", req.code.as_str()),
                ("editor_type", req.editor_type.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, path, filename = %req.filename, "submission response");

        if !status.is_success() {
            return Err(UpstreamError::Rejected { status, body });
        }
        Ok(serde_json::from_str(&body)?)
    }
}
