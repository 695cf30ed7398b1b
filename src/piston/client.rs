//! Reqwest-based client for the Piston `/execute` and `/runtimes` endpoints.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{ExecutePayload, ExecutionFailure, ExecutionLimits, ExecutionRequest, ExecutionResult, Executor, Runtime};
use crate::config::Config;

#[derive(Debug, Clone)]
pub struct PistonClient {
    http: Client,
    base_url: String,
    limits: ExecutionLimits,
}

impl PistonClient {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(cfg.api_url(), cfg.request_timeout(), ExecutionLimits::from_config(cfg))
    }

    /// `timeout` bounds the whole HTTP call; `limits` are enforced by the service.
    pub fn new(base_url: impl Into<String>, timeout: Duration, limits: ExecutionLimits) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url, limits })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Runtimes installed on the service.
    pub async fn runtimes(&self) -> Result<Vec<Runtime>, ExecutionFailure> {
        let url = format!("{}/runtimes", self.base_url);
        debug!(%url, "listing runtimes");
        let resp = self.http.get(&url).send().await.map_err(classify_send_error)?;
        read_json(resp).await
    }
}

#[async_trait]
impl Executor for PistonClient {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, ExecutionFailure> {
        let url = format!("{}/execute", self.base_url);
        let payload = ExecutePayload::new(request, &self.limits);
        info!(
            language = %request.language,
            version = %request.version,
            bytes = request.source_code.len(),
            "submitting code"
        );

        let resp = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(classify_send_error)?;

        let result: ExecutionResult = read_json(resp).await?;
        debug!(
            compile_code = ?result.compile.as_ref().and_then(|s| s.exit_code),
            run_code = ?result.run.as_ref().and_then(|s| s.exit_code),
            "execution finished"
        );
        Ok(result)
    }
}

/// Turns a completed HTTP exchange into `T`, classifying every failure.
async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ExecutionFailure> {
    let status = resp.status();
    if !status.is_success() {
        let url = resp.url().to_string();
        let body = resp.text().await.unwrap_or_default();
        let api_message = extract_api_message(&body);
        warn!(%status, api_message = ?api_message, "execution service rejected request");
        return Err(ExecutionFailure::Transport {
            message: format!("HTTP status {} for url ({})", status, url),
            api_message,
        });
    }

    let bytes = resp.bytes().await.map_err(classify_send_error)?;
    serde_json::from_slice::<T>(&bytes).map_err(|e| {
        warn!(error = %e, "malformed response body");
        ExecutionFailure::Unexpected(format!("malformed response from execution service: {}", e))
    })
}

fn classify_send_error(e: reqwest::Error) -> ExecutionFailure {
    if e.is_timeout() {
        warn!("request timed out");
        ExecutionFailure::Timeout
    } else if e.is_builder() || e.is_decode() {
        ExecutionFailure::Unexpected(e.to_string())
    } else {
        warn!(error = %e, "transport error");
        ExecutionFailure::Transport { message: e.to_string(), api_message: None }
    }
}

/// Pulls a `message` string out of a JSON error body, if there is one.
fn extract_api_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}
