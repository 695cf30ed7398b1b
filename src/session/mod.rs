//! Session state machine: language selection, code buffer and last outcome.

use thiserror::Error;
use tracing::debug;

use crate::{
    language::Language,
    piston::{ExecutionFailure, ExecutionRequest, ExecutionResult, Executor},
};

/// What the last submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Result(ExecutionResult),
    Failure(ExecutionFailure),
}

impl From<Result<ExecutionResult, ExecutionFailure>> for Outcome {
    fn from(r: Result<ExecutionResult, ExecutionFailure>) -> Self {
        match r {
            Ok(result) => Outcome::Result(result),
            Err(failure) => Outcome::Failure(failure),
        }
    }
}

/// A submit that was refused before reaching the service. Both are transient
/// warnings; the session is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Please enter some code to run.")]
    EmptyInput,
    #[error("An execution is already running.")]
    Busy,
}

/// A submission handed out by `begin_submit`. The language is fixed here so a
/// later selector change cannot relabel the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    request: ExecutionRequest,
}

impl PendingSubmission {
    pub fn request(&self) -> &ExecutionRequest {
        &self.request
    }

    pub fn language(&self) -> Language {
        self.request.language
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    selected_language: Language,
    code_buffer: String,
    last_outcome: Option<Outcome>,
    language_of_last_outcome: Option<Language>,
    in_flight: Option<Language>,
}

impl SessionState {
    pub fn new(selected_language: Language) -> Self {
        Self { selected_language, ..Default::default() }
    }

    pub fn selected_language(&self) -> Language {
        self.selected_language
    }

    pub fn code(&self) -> &str {
        &self.code_buffer
    }

    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    pub fn language_of_last_outcome(&self) -> Option<Language> {
        self.language_of_last_outcome
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Language of the outstanding submission, if any.
    pub fn running_language(&self) -> Option<Language> {
        self.in_flight
    }

    /// Leaves the buffer and outcome alone; a no-op for the current language.
    pub fn select_language(&mut self, language: Language) {
        if self.selected_language != language {
            debug!(from = %self.selected_language, to = %language, "language selected");
            self.selected_language = language;
        }
    }

    pub fn edit_code(&mut self, text: impl Into<String>) {
        self.code_buffer = text.into();
    }

    /// Mutable access for in-place editors. Same contract as `edit_code`.
    pub fn code_mut(&mut self) -> &mut String {
        &mut self.code_buffer
    }

    pub fn clear(&mut self) {
        debug!("session cleared");
        self.code_buffer.clear();
        self.drop_outcome();
    }

    /// Replaces the buffer with the selected language's example and drops the
    /// outcome, which no longer matches the code.
    pub fn load_example(&mut self) {
        debug!(language = %self.selected_language, "example loaded");
        self.code_buffer = self.selected_language.example().to_string();
        self.drop_outcome();
    }

    fn drop_outcome(&mut self) {
        self.last_outcome = None;
        self.language_of_last_outcome = None;
    }

    /// First half of a submit. Refuses blank code and a second submission
    /// while one is outstanding, without touching any state.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitError> {
        if self.in_flight.is_some() {
            return Err(SubmitError::Busy);
        }
        if self.code_buffer.trim().is_empty() {
            return Err(SubmitError::EmptyInput);
        }
        self.in_flight = Some(self.selected_language);
        debug!(language = %self.selected_language, "submission started");
        Ok(PendingSubmission {
            request: ExecutionRequest::latest(self.selected_language, self.code_buffer.clone()),
        })
    }

    /// Second half of a submit: records the outcome under the language
    /// captured by `begin_submit`.
    pub fn complete(&mut self, pending: PendingSubmission, outcome: impl Into<Outcome>) {
        let outcome = outcome.into();
        debug!(
            language = %pending.language(),
            failed = matches!(outcome, Outcome::Failure(_)),
            "submission completed"
        );
        self.language_of_last_outcome = Some(pending.language());
        self.last_outcome = Some(outcome);
        self.in_flight = None;
    }

    /// Runs a whole submit against `executor`.
    pub async fn submit<E: Executor + ?Sized>(&mut self, executor: &E) -> Result<(), SubmitError> {
        let pending = self.begin_submit()?;
        let outcome = executor.execute(pending.request()).await;
        self.complete(pending, outcome);
        Ok(())
    }
}
