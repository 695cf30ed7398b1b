//! Piston execution API: wire types, failure taxonomy and the `Executor` seam.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::{config::Config, language::Language};

pub mod client;

pub use client::PistonClient;

/// Version wildcard understood by the service as "latest".
pub const LATEST_VERSION: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub language: Language,
    pub version: String,
    pub source_code: String,
}

impl ExecutionRequest {
    pub fn latest(language: Language, source_code: impl Into<String>) -> Self {
        Self {
            language,
            version: LATEST_VERSION.to_string(),
            source_code: source_code.into(),
        }
    }
}

/// Service-side resource ceilings sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionLimits {
    pub compile_timeout_ms: u64,
    pub run_timeout_ms: u64,
    /// -1 means unbounded.
    pub compile_memory_limit: i64,
    pub run_memory_limit: i64,
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        Self {
            compile_timeout_ms: 10_000,
            run_timeout_ms: 3_000,
            compile_memory_limit: -1,
            run_memory_limit: -1,
        }
    }
}

impl ExecutionLimits {
    pub fn from_config(cfg: &Config) -> Self {
        let d = Self::default();
        Self {
            compile_timeout_ms: cfg.get_u64("COMPILE_TIMEOUT").unwrap_or(d.compile_timeout_ms),
            run_timeout_ms: cfg.get_u64("RUN_TIMEOUT").unwrap_or(d.run_timeout_ms),
            compile_memory_limit: cfg.get_i64("COMPILE_MEMORY_LIMIT").unwrap_or(d.compile_memory_limit),
            run_memory_limit: cfg.get_i64("RUN_MEMORY_LIMIT").unwrap_or(d.run_memory_limit),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ExecutePayload<'a> {
    pub language: &'a str,
    pub version: &'a str,
    pub files: Vec<SourceFile<'a>>,
    pub stdin: &'a str,
    pub args: Vec<String>,
    pub compile_timeout: u64,
    pub run_timeout: u64,
    pub compile_memory_limit: i64,
    pub run_memory_limit: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct SourceFile<'a> {
    pub content: &'a str,
}

impl<'a> ExecutePayload<'a> {
    pub fn new(request: &'a ExecutionRequest, limits: &ExecutionLimits) -> Self {
        Self {
            language: request.language.name(),
            version: &request.version,
            files: vec![SourceFile { content: &request.source_code }],
            stdin: "",
            args: Vec::new(),
            compile_timeout: limits.compile_timeout_ms,
            run_timeout: limits.run_timeout_ms,
            compile_memory_limit: limits.compile_memory_limit,
            run_memory_limit: limits.run_memory_limit,
        }
    }
}

/// One stage (compile or run) of an execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StageResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub stdout: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stderr: String,
    #[serde(default, rename = "code")]
    pub exit_code: Option<i64>,
    #[serde(default)]
    pub signal: Option<String>,
}

impl StageResult {
    /// Only an explicit zero exit without a signal counts. Piston reports
    /// `code: null` alongside the signal when it kills a stage.
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0) && self.signal.is_none()
    }

    pub fn has_output(&self) -> bool {
        !self.stdout.is_empty() || !self.stderr.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExecutionResult {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub compile: Option<StageResult>,
    #[serde(default)]
    pub run: Option<StageResult>,
}

impl ExecutionResult {
    pub fn compile_ok(&self) -> bool {
        self.compile.as_ref().map_or(true, StageResult::succeeded)
    }

    pub fn run_ok(&self) -> bool {
        self.run.as_ref().map_or(true, StageResult::succeeded)
    }

    pub fn overall_success(&self) -> bool {
        self.compile_ok() && self.run_ok()
    }
}

/// Why no `ExecutionResult` could be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionFailure {
    #[error("The request to the Piston API timed out.")]
    Timeout,
    #[error("Error communicating with the Piston API: {message}{}", api_suffix(.api_message))]
    Transport {
        message: String,
        api_message: Option<String>,
    },
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

fn api_suffix(api_message: &Option<String>) -> String {
    match api_message {
        Some(m) => format!("\nAPI Message: {}", m),
        None => String::new(),
    }
}

/// One installed runtime reported by `GET /runtimes`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Runtime {
    pub language: String,
    pub version: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub runtime: Option<String>,
}

/// Anything that can run an `ExecutionRequest`. Sessions are generic over this
/// so they can be driven without a network.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, ExecutionFailure>;
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_matches_service_shape() {
        let req = ExecutionRequest::latest(Language::Cpp, "int main(){}");
        let payload = ExecutePayload::new(&req, &ExecutionLimits::default());
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "language": "cpp",
                "version": "*",
                "files": [{ "content": "int main(){}" }],
                "stdin": "",
                "args": [],
                "compile_timeout": 10000,
                "run_timeout": 3000,
                "compile_memory_limit": -1,
                "run_memory_limit": -1
            })
        );
    }

    #[test]
    fn absent_and_null_fields_are_empty() {
        let result: ExecutionResult = serde_json::from_value(json!({
            "run": { "stdout": null, "code": 0 }
        }))
        .unwrap();
        assert!(result.compile.is_none());
        let run = result.run.unwrap();
        assert_eq!(run.stdout, "");
        assert_eq!(run.stderr, "");
        assert_eq!(run.exit_code, Some(0));
        assert_eq!(run.signal, None);
    }

    #[test]
    fn empty_body_is_tolerated() {
        let result: ExecutionResult = serde_json::from_value(json!({})).unwrap();
        assert_eq!(result, ExecutionResult::default());
        assert!(result.overall_success());
    }

    #[test]
    fn overall_success_needs_both_stages() {
        let ok = StageResult { exit_code: Some(0), ..Default::default() };
        let bad = StageResult { exit_code: Some(1), ..Default::default() };

        let interpreted = ExecutionResult { run: Some(ok.clone()), ..Default::default() };
        assert!(interpreted.overall_success());

        let compile_failed = ExecutionResult {
            compile: Some(bad.clone()),
            run: Some(ok.clone()),
            ..Default::default()
        };
        assert!(!compile_failed.compile_ok());
        assert!(!compile_failed.overall_success());

        let run_failed = ExecutionResult { run: Some(bad), ..Default::default() };
        assert!(!run_failed.overall_success());
    }

    #[test]
    fn killed_or_codeless_run_is_not_a_success() {
        let killed: ExecutionResult = serde_json::from_value(json!({
            "run": { "stdout": "partial", "code": null, "signal": "SIGKILL" }
        }))
        .unwrap();
        assert!(!killed.run_ok());
        assert!(!killed.overall_success());

        let codeless: ExecutionResult = serde_json::from_value(json!({ "run": { "stdout": "x" } })).unwrap();
        assert!(!codeless.overall_success());

        let signalled = StageResult { exit_code: Some(0), signal: Some("SIGTERM".into()), ..Default::default() };
        assert!(!signalled.succeeded());
    }

    #[test]
    fn interleaved_output_field_is_ignored() {
        let result: ExecutionResult = serde_json::from_value(json!({
            "run": { "stdout": "a", "stderr": "b", "output": "ab", "code": 0 }
        }))
        .unwrap();
        assert!(result.overall_success());
        let run = result.run.unwrap();
        assert_eq!(run.stdout, "a");
        assert_eq!(run.stderr, "b");
    }

    #[test]
    fn failure_messages() {
        assert!(ExecutionFailure::Timeout.to_string().contains("timed out"));

        let with_api = ExecutionFailure::Transport {
            message: "HTTP status 400 Bad Request".into(),
            api_message: Some("python-* runtime is unknown".into()),
        };
        assert_eq!(
            with_api.to_string(),
            "Error communicating with the Piston API: HTTP status 400 Bad Request\nAPI Message: python-* runtime is unknown"
        );

        let bare = ExecutionFailure::Transport { message: "connection refused".into(), api_message: None };
        assert!(!bare.to_string().contains("API Message"));
    }

    #[test]
    fn limits_follow_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::from_file(&dir.path().join("missing"));
        cfg.set("RUN_TIMEOUT", "1500");
        cfg.set("RUN_MEMORY_LIMIT", "not-a-number");
        let limits = ExecutionLimits::from_config(&cfg);
        assert_eq!(limits.run_timeout_ms, 1500);
        assert_eq!(limits.run_memory_limit, -1);
        assert_eq!(limits.compile_timeout_ms, 10_000);
    }
}
