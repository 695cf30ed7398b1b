//! TUI application state: the session plus editor and status-bar state.

use std::time::{Duration, Instant};

use tracing::info;

use crate::{
    language::Language,
    piston::{ExecutionFailure, ExecutionResult},
    session::{PendingSubmission, SessionState, SubmitError},
    utils::unicode::{char_to_byte_index, index_of, line_col},
    view::{derive_view_model, ViewModel},
};

/// How long a transient warning stays in the status bar.
pub const TOAST_TTL: Duration = Duration::from_secs(3);

const TAB: &str = "    ";

/// A transient, non-persistent message.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub text: String,
    pub shown_at: Instant,
}

#[derive(Debug)]
pub struct App {
    /// Language, code buffer and last outcome
    pub session: SessionState,
    /// Cursor position in the code buffer (character index)
    pub cursor: usize,
    /// Whether to show help
    pub show_help: bool,
    /// Current transient warning, if any
    pub toast: Option<Toast>,
    /// Scroll offset for the output pane (lines from the top)
    pub output_scroll: u16,
    /// Spinner frame, advanced on every draw while running
    pub tick: usize,
    /// Execution service shown in the status bar
    pub api_url: String,
    /// Timestamp of last Ctrl+C press for double Ctrl+C detection
    pub last_ctrl_c_time: Option<Instant>,
}

impl App {
    pub fn new(language: Language, api_url: String) -> Self {
        Self {
            session: SessionState::new(language),
            cursor: 0,
            show_help: false,
            toast: None,
            output_scroll: 0,
            tick: 0,
            api_url,
            last_ctrl_c_time: None,
        }
    }

    pub fn view_model(&self) -> ViewModel {
        derive_view_model(&self.session)
    }

    pub fn status_message(&self) -> String {
        format!(
            "Ctrl+R run | Ctrl+L clear | Ctrl+E example | Ctrl+N/P language | F1 help | {}",
            self.api_url
        )
    }

    pub fn show_toast(&mut self, text: impl Into<String>) {
        self.toast = Some(Toast { text: text.into(), shown_at: Instant::now() });
    }

    /// The toast, unless it has expired.
    pub fn active_toast(&self) -> Option<&Toast> {
        self.toast.as_ref().filter(|t| t.shown_at.elapsed() < TOAST_TTL)
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // ----- Session transitions -----

    pub fn next_language(&mut self) {
        self.session.select_language(self.session.selected_language().next());
    }

    pub fn prev_language(&mut self) {
        self.session.select_language(self.session.selected_language().prev());
    }

    /// Clear and load-example would orphan an outstanding result, so they
    /// wait until it arrives.
    pub fn clear(&mut self) {
        if self.refuse_while_running() {
            return;
        }
        self.session.clear();
        self.cursor = 0;
        self.output_scroll = 0;
    }

    pub fn load_example(&mut self) {
        if self.refuse_while_running() {
            return;
        }
        self.session.load_example();
        self.cursor = self.session.code().chars().count();
        self.output_scroll = 0;
    }

    /// Starts a submission, or shows a toast when it is refused.
    pub fn begin_submit(&mut self) -> Option<PendingSubmission> {
        match self.session.begin_submit() {
            Ok(pending) => {
                info!(language = %pending.language(), "running code");
                Some(pending)
            }
            Err(e) => {
                self.show_toast(format!("⚠️ {}", e));
                None
            }
        }
    }

    pub fn complete(&mut self, pending: PendingSubmission, outcome: Result<ExecutionResult, ExecutionFailure>) {
        self.session.complete(pending, outcome);
        self.output_scroll = 0;
    }

    fn refuse_while_running(&mut self) -> bool {
        if self.session.is_running() {
            self.show_toast(format!("⚠️ {}", SubmitError::Busy));
            true
        } else {
            false
        }
    }

    // ----- Output scrolling -----

    pub fn scroll_up(&mut self) {
        self.output_scroll = self.output_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.output_scroll = self.output_scroll.saturating_add(1);
    }

    // ----- Editor helpers -----

    fn char_len(&self) -> usize {
        self.session.code().chars().count()
    }

    /// (row, column) of the cursor, in characters.
    pub fn cursor_position(&self) -> (usize, usize) {
        line_col(self.session.code(), self.cursor)
    }

    pub fn insert_str(&mut self, text: &str) {
        let at = char_to_byte_index(self.session.code(), self.cursor);
        self.session.code_mut().insert_str(at, text);
        self.cursor += text.chars().count();
    }

    pub fn insert_char(&mut self, c: char) {
        let at = char_to_byte_index(self.session.code(), self.cursor);
        self.session.code_mut().insert(at, c);
        self.cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn insert_tab(&mut self) {
        self.insert_str(TAB);
    }

    /// Bracketed paste; CRLF is normalised.
    pub fn paste(&mut self, text: &str) {
        self.insert_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = char_to_byte_index(self.session.code(), self.cursor);
        self.session.code_mut().remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = char_to_byte_index(self.session.code(), self.cursor);
            self.session.code_mut().remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn move_cursor_up(&mut self) {
        let (row, col) = self.cursor_position();
        if row > 0 {
            self.cursor = index_of(self.session.code(), row - 1, col);
        }
    }

    pub fn move_cursor_down(&mut self) {
        let (row, col) = self.cursor_position();
        let last_row = self.session.code().matches('\n').count();
        if row < last_row {
            self.cursor = index_of(self.session.code(), row + 1, col);
        }
    }

    pub fn move_cursor_home(&mut self) {
        let (row, _) = self.cursor_position();
        self.cursor = index_of(self.session.code(), row, 0);
    }

    pub fn move_cursor_end(&mut self) {
        let (row, _) = self.cursor_position();
        self.cursor = index_of(self.session.code(), row, usize::MAX);
    }

    /// Handle Ctrl+C press and detect double press for quit
    /// Returns true if should quit (double Ctrl+C), false otherwise
    pub fn handle_ctrl_c(&mut self) -> bool {
        const DOUBLE_CTRL_C_TIMEOUT: Duration = Duration::from_millis(500);

        let now = Instant::now();

        if let Some(last_time) = self.last_ctrl_c_time {
            if now.duration_since(last_time) <= DOUBLE_CTRL_C_TIMEOUT {
                self.last_ctrl_c_time = None;
                return true;
            }
        }

        self.last_ctrl_c_time = Some(now);
        self.show_toast("Press Ctrl+C again to quit");
        false
    }
}
