//! Renderable view of a session, derived on demand.
//!
//! `derive_view_model` is a pure function of `SessionState`; the TUI and the
//! one-shot printer both call it after every transition and draw the result.

use crate::{
    language::Language,
    piston::{ExecutionFailure, ExecutionResult, StageResult},
    session::{Outcome, SessionState},
};

pub const PROMPT_TEXT: &str = "Enter code and run it to see the results here.";
pub const SUCCESS_TEXT: &str = "Execution Completed Successfully!";
pub const ERRORS_TEXT: &str = "Execution Finished with Errors.";
pub const NO_OUTPUT_TEXT: &str = "No output (stdout/stderr) was produced during compilation or runtime.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Neutral,
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub severity: Severity,
    pub text: String,
}

impl Banner {
    fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self { severity, text: text.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Compile,
    Run,
}

impl Stage {
    pub fn title(self) -> &'static str {
        match self {
            Stage::Compile => "Compilation Stage Details",
            Stage::Run => "Runtime Stage Details",
        }
    }

    fn stdout_label(self) -> &'static str {
        match self {
            Stage::Compile => "Compiler Output (stdout):",
            Stage::Run => "Program Output (stdout):",
        }
    }

    fn stderr_label(self) -> &'static str {
        match self {
            Stage::Compile => "Compiler Errors/Warnings (stderr):",
            Stage::Run => "Runtime Error Output (stderr):",
        }
    }

    /// Compiler stderr is often just warnings; runtime stderr is an error.
    fn stderr_severity(self) -> Severity {
        match self {
            Stage::Compile => Severity::Warning,
            Stage::Run => Severity::Error,
        }
    }

    fn failure_severity(self) -> Severity {
        self.stderr_severity()
    }

    fn exit_label(self) -> &'static str {
        match self {
            Stage::Compile => "Compile Exit Code",
            Stage::Run => "Runtime Exit Code",
        }
    }
}

/// A labelled block of captured output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBlock {
    pub label: &'static str,
    pub severity: Severity,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitIndicator {
    /// Non-zero (or missing) code, or killed by a signal.
    pub flagged: bool,
    pub severity: Severity,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSection {
    pub stage: Stage,
    pub stdout: Option<OutputBlock>,
    pub stderr: Option<OutputBlock>,
    pub exit: ExitIndicator,
    /// Hint for collapsible renderers.
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Nothing submitted yet.
    Empty,
    /// Failure banner only.
    Failure,
    Sections(Vec<StageSection>),
    NoOutput { notice: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub banner: Banner,
    pub body: Body,
    /// Language tag for code blocks: the language that produced the outcome.
    pub code_language: Option<Language>,
    /// Runtime reported by the service, e.g. "python 3.10.0".
    pub runtime: Option<String>,
    /// Set while a submission is outstanding.
    pub running: Option<Language>,
}

#[cfg(test)]
impl ViewModel {
    pub fn sections(&self) -> &[StageSection] {
        match &self.body {
            Body::Sections(sections) => sections,
            _ => &[],
        }
    }

    pub fn section(&self, stage: Stage) -> Option<&StageSection> {
        self.sections().iter().find(|s| s.stage == stage)
    }
}

pub fn derive_view_model(state: &SessionState) -> ViewModel {
    let (banner, body) = match state.last_outcome() {
        None => (Banner::new(Severity::Info, PROMPT_TEXT), Body::Empty),
        Some(Outcome::Failure(failure)) => (failure_banner(failure), Body::Failure),
        Some(Outcome::Result(result)) => result_view(result),
    };
    let runtime = match state.last_outcome() {
        Some(Outcome::Result(ExecutionResult { language: Some(l), version: Some(v), .. })) => Some(format!("{} {}", l, v)),
        _ => None,
    };

    ViewModel {
        banner,
        body,
        runtime,
        code_language: state.language_of_last_outcome(),
        running: state.running_language(),
    }
}

fn failure_banner(failure: &ExecutionFailure) -> Banner {
    Banner::new(Severity::Error, format!("❌ {}", failure))
}

fn result_view(result: &ExecutionResult) -> (Banner, Body) {
    let banner = if result.overall_success() {
        Banner::new(Severity::Success, format!("✅ {}", SUCCESS_TEXT))
    } else {
        Banner::new(Severity::Error, format!("❌ {}", ERRORS_TEXT))
    };

    let sections: Vec<StageSection> = [
        (Stage::Compile, result.compile.as_ref()),
        (Stage::Run, result.run.as_ref()),
    ]
    .into_iter()
    .filter_map(|(stage, stage_result)| stage_section(stage, stage_result?))
    .collect();

    let body = if sections.is_empty() {
        Body::NoOutput { notice: NO_OUTPUT_TEXT.to_string() }
    } else {
        Body::Sections(sections)
    };
    (banner, body)
}

/// `None` when the stage printed nothing at all.
fn stage_section(stage: Stage, result: &StageResult) -> Option<StageSection> {
    if !result.has_output() {
        return None;
    }

    let stdout = (!result.stdout.is_empty()).then(|| OutputBlock {
        label: stage.stdout_label(),
        severity: Severity::Neutral,
        text: result.stdout.clone(),
    });
    let stderr = (!result.stderr.is_empty()).then(|| OutputBlock {
        label: stage.stderr_label(),
        severity: stage.stderr_severity(),
        text: result.stderr.clone(),
    });

    Some(StageSection {
        stage,
        expanded: !result.succeeded() || stdout.is_some(),
        stdout,
        stderr,
        exit: exit_indicator(stage, result),
    })
}

fn exit_indicator(stage: Stage, result: &StageResult) -> ExitIndicator {
    let flagged = !result.succeeded();
    let code = match result.exit_code {
        Some(c) => c.to_string(),
        None => "none".to_string(),
    };
    let text = match &result.signal {
        Some(sig) => format!("{}: {} (signal {})", stage.exit_label(), code, sig),
        None => format!("{}: {}", stage.exit_label(), code),
    };
    ExitIndicator {
        flagged,
        severity: if flagged { stage.failure_severity() } else { Severity::Neutral },
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::{hello_result, MockExecutor};
    use serde_json::json;

    fn state_with(language: Language, outcome: Result<ExecutionResult, ExecutionFailure>) -> SessionState {
        let mut s = SessionState::new(language);
        s.edit_code("code");
        let pending = s.begin_submit().unwrap();
        s.complete(pending, outcome);
        s
    }

    fn result_from(value: serde_json::Value) -> ExecutionResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn no_outcome_shows_prompt() {
        let vm = derive_view_model(&SessionState::default());
        assert_eq!(vm.banner, Banner::new(Severity::Info, PROMPT_TEXT));
        assert_eq!(vm.body, Body::Empty);
        assert_eq!(vm.code_language, None);
    }

    #[test]
    fn derivation_is_repeatable() {
        let s = state_with(Language::Python, Ok(hello_result()));
        assert_eq!(derive_view_model(&s), derive_view_model(&s));

        let s = SessionState::default();
        assert_eq!(derive_view_model(&s), derive_view_model(&s));
    }

    #[tokio::test]
    async fn test_hello_round_trip() {
        let exec = MockExecutor::new(Ok(hello_result()));
        let mut s = SessionState::new(Language::Python);
        s.load_example();
        s.submit(&exec).await.unwrap();

        let vm = derive_view_model(&s);
        assert_eq!(vm.banner.severity, Severity::Success);
        assert!(vm.section(Stage::Compile).is_none());

        let run = vm.section(Stage::Run).unwrap();
        assert_eq!(run.stdout.as_ref().unwrap().text, "Hello, Streamlit!\n");
        assert!(run.stderr.is_none());
        assert!(!run.exit.flagged);
        assert_eq!(run.exit.text, "Runtime Exit Code: 0");
        assert!(run.expanded);
        assert_eq!(vm.code_language, Some(Language::Python));
    }

    #[test]
    fn runtime_error_is_flagged() {
        let s = state_with(
            Language::Python,
            Ok(result_from(json!({ "run": { "stderr": "SyntaxError", "code": 1 } }))),
        );
        let vm = derive_view_model(&s);
        assert_eq!(vm.banner.severity, Severity::Error);
        assert!(vm.banner.text.contains(ERRORS_TEXT));
        assert!(vm.section(Stage::Compile).is_none());

        let run = vm.section(Stage::Run).unwrap();
        assert!(run.stdout.is_none());
        let stderr = run.stderr.as_ref().unwrap();
        assert_eq!(stderr.text, "SyntaxError");
        assert_eq!(stderr.severity, Severity::Error);
        assert!(run.exit.flagged);
        assert_eq!(run.exit.text, "Runtime Exit Code: 1");
        assert!(run.expanded);
    }

    #[test]
    fn compile_warnings_use_warning_severity() {
        let s = state_with(
            Language::C,
            Ok(result_from(json!({
                "compile": { "stderr": "warning: unused variable", "code": 0 },
                "run": { "stdout": "ok", "code": 0 }
            }))),
        );
        let vm = derive_view_model(&s);
        assert_eq!(vm.banner.severity, Severity::Success);
        let compile = vm.section(Stage::Compile).unwrap();
        assert_eq!(compile.stderr.as_ref().unwrap().severity, Severity::Warning);
        assert!(!compile.exit.flagged);
        assert!(!compile.expanded);
        assert_eq!(vm.sections().len(), 2);
    }

    #[test]
    fn compile_failure_is_flagged_as_warning() {
        let s = state_with(
            Language::Rust,
            Ok(result_from(json!({
                "compile": { "stderr": "error[E0425]", "code": 1 }
            }))),
        );
        let vm = derive_view_model(&s);
        assert_eq!(vm.banner.severity, Severity::Error);
        let compile = vm.section(Stage::Compile).unwrap();
        assert!(compile.exit.flagged);
        assert_eq!(compile.exit.severity, Severity::Warning);
        assert_eq!(compile.exit.text, "Compile Exit Code: 1");
    }

    #[test]
    fn signal_is_reported() {
        let s = state_with(
            Language::Bash,
            Ok(result_from(json!({
                "run": { "stdout": "partial", "code": null, "signal": "SIGKILL" }
            }))),
        );
        let vm = derive_view_model(&s);
        assert_eq!(vm.banner.severity, Severity::Error);
        assert!(vm.banner.text.starts_with("❌ "));
        let run = vm.section(Stage::Run).cloned().unwrap();
        assert!(run.exit.flagged);
        assert!(run.expanded);
        assert_eq!(run.exit.text, "Runtime Exit Code: none (signal SIGKILL)");
    }

    #[test]
    fn silent_stages_collapse_into_one_notice() {
        let s = state_with(
            Language::Java,
            Ok(result_from(json!({
                "compile": { "stdout": "", "stderr": "", "code": 0 },
                "run": { "code": 0 }
            }))),
        );
        let vm = derive_view_model(&s);
        assert_eq!(vm.banner.severity, Severity::Success);
        assert_eq!(vm.body, Body::NoOutput { notice: NO_OUTPUT_TEXT.to_string() });
        assert!(vm.sections().is_empty());
    }

    #[test]
    fn missing_stages_are_no_output() {
        let s = state_with(Language::Go, Ok(result_from(json!({}))));
        let vm = derive_view_model(&s);
        assert!(matches!(vm.body, Body::NoOutput { .. }));
    }

    #[test]
    fn timeout_banner_differs_from_transport_banner() {
        let timeout = derive_view_model(&state_with(Language::Python, Err(ExecutionFailure::Timeout)));
        let transport = derive_view_model(&state_with(
            Language::Python,
            Err(ExecutionFailure::Transport { message: "connection refused".into(), api_message: None }),
        ));

        assert_eq!(timeout.banner.severity, Severity::Error);
        assert_eq!(timeout.body, Body::Failure);
        assert!(timeout.banner.text.contains("timed out"));
        assert_ne!(timeout.banner, transport.banner);
        assert!(transport.banner.text.contains("connection refused"));
    }

    #[test]
    fn transport_banner_appends_api_message() {
        let vm = derive_view_model(&state_with(
            Language::Cpp,
            Err(ExecutionFailure::Transport {
                message: "HTTP status 400 Bad Request".into(),
                api_message: Some("cpp-* runtime is unknown".into()),
            }),
        ));
        assert!(vm.banner.text.ends_with("API Message: cpp-* runtime is unknown"));
    }

    #[test]
    fn runtime_caption_from_service_echo() {
        let s = state_with(
            Language::Python,
            Ok(result_from(json!({ "language": "python", "version": "3.10.0", "run": { "code": 0 } }))),
        );
        assert_eq!(derive_view_model(&s).runtime.as_deref(), Some("python 3.10.0"));
        let s = state_with(Language::Python, Ok(hello_result()));
        assert_eq!(derive_view_model(&s).runtime, None);
    }

    #[test]
    fn running_language_is_exposed() {
        let mut s = SessionState::new(Language::Go);
        s.edit_code("package main");
        let _pending = s.begin_submit().unwrap();
        s.select_language(Language::Rust);
        assert_eq!(derive_view_model(&s).running, Some(Language::Go));
    }
}
