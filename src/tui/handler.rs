//! Async event handler for the TUI.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::{app::App, events::TuiEvent, ui::render_ui};
use crate::{language::Language, piston::Executor};

/// Run the TUI until the user quits
pub async fn run_tui(executor: Arc<dyn Executor>, language: Language, api_url: String) -> Result<()> {
    // Check if we're in a proper terminal environment
    if !io::IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!("TUI mode requires a proper terminal environment"));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(language, api_url);
    let (event_tx, event_rx) = mpsc::unbounded_channel::<TuiEvent>();
    info!(language = %language, "tui started");

    let result = run_app(&mut terminal, &mut app, executor, event_tx, event_rx).await;

    // Restore terminal
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableBracketedPaste)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    executor: Arc<dyn Executor>,
    event_tx: mpsc::UnboundedSender<TuiEvent>,
    mut event_rx: mpsc::UnboundedReceiver<TuiEvent>,
) -> Result<()> {
    // Spawn input handler
    let input_tx = event_tx.clone();
    tokio::task::spawn_blocking(move || loop {
        if input_tx.is_closed() {
            break;
        }
        if event::poll(Duration::from_millis(100)).unwrap_or(false) {
            let forwarded = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => input_tx.send(TuiEvent::Key(key)),
                Ok(Event::Paste(text)) => input_tx.send(TuiEvent::Paste(text)),
                Ok(_) => Ok(()),
                Err(_) => input_tx.send(TuiEvent::Quit),
            };
            if forwarded.is_err() {
                break; // Channel closed
            }
        }
    });

    loop {
        if app.session.is_running() {
            app.tick = app.tick.wrapping_add(1);
        }
        terminal.draw(|frame| render_ui(frame, app))?;

        while let Ok(tui_event) = event_rx.try_recv() {
            if handle_event(app, tui_event, &executor, &event_tx) {
                return Ok(());
            }
        }

        // Small delay to prevent busy waiting
        tokio::time::sleep(Duration::from_millis(16)).await; // ~60 FPS
    }
}

/// Apply one event. Returns true when the app should quit.
pub(crate) fn handle_event(
    app: &mut App,
    tui_event: TuiEvent,
    executor: &Arc<dyn Executor>,
    event_tx: &mpsc::UnboundedSender<TuiEvent>,
) -> bool {
    match tui_event {
        TuiEvent::Key(key) => handle_key_event(app, key, executor, event_tx),
        TuiEvent::Paste(text) => {
            app.paste(&text);
            false
        }
        TuiEvent::ExecutionFinished { pending, outcome } => {
            app.complete(pending, outcome);
            false
        }
        TuiEvent::Quit => true,
    }
}

/// Handle keyboard events. Returns true when the app should quit.
fn handle_key_event(
    app: &mut App,
    key: KeyEvent,
    executor: &Arc<dyn Executor>,
    event_tx: &mpsc::UnboundedSender<TuiEvent>,
) -> bool {
    // Help overlay swallows everything except its own toggle
    if app.show_help {
        if matches!(key.code, KeyCode::F(1) | KeyCode::Esc) {
            app.toggle_help();
        }
        return false;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => return app.handle_ctrl_c(),
        KeyCode::Esc => return true,
        KeyCode::Char('r') if ctrl => submit(app, executor, event_tx),
        KeyCode::F(5) => submit(app, executor, event_tx),
        KeyCode::Char('l') if ctrl => app.clear(),
        KeyCode::Char('e') if ctrl => app.load_example(),
        KeyCode::Char('n') if ctrl => app.next_language(),
        KeyCode::Char('p') if ctrl => app.prev_language(),
        KeyCode::F(1) => app.toggle_help(),
        KeyCode::PageUp => app.scroll_up(),
        KeyCode::PageDown => app.scroll_down(),
        KeyCode::Up => app.move_cursor_up(),
        KeyCode::Down => app.move_cursor_down(),
        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Home => app.move_cursor_home(),
        KeyCode::End => app.move_cursor_end(),
        KeyCode::Enter => app.insert_newline(),
        KeyCode::Tab => app.insert_tab(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Char(c) if !ctrl => app.insert_char(c),
        _ => {}
    }
    false
}

/// Start a submission and send the request from a background task so the
/// UI keeps drawing. The result comes back as `ExecutionFinished`.
fn submit(app: &mut App, executor: &Arc<dyn Executor>, event_tx: &mpsc::UnboundedSender<TuiEvent>) {
    let Some(pending) = app.begin_submit() else {
        return;
    };

    let executor = Arc::clone(executor);
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let outcome = executor.execute(pending.request()).await;
        debug!(ok = outcome.is_ok(), "execution task finished");
        // Channel closed means the UI is gone
        let _ = tx.send(TuiEvent::ExecutionFinished { pending, outcome });
    });
}
