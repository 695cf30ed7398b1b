//! Custom event types for TUI application.

use crossterm::event::KeyEvent;

use crate::piston::{ExecutionFailure, ExecutionResult};
use crate::session::PendingSubmission;

/// Events that can occur in the TUI application
#[derive(Debug)]
pub enum TuiEvent {
    /// User keyboard input
    Key(KeyEvent),
    /// Bracketed paste content
    Paste(String),
    /// The execution service answered (or failed) for a submission
    ExecutionFinished {
        pending: PendingSubmission,
        outcome: Result<ExecutionResult, ExecutionFailure>,
    },
    /// Request to quit the application
    Quit,
}
