//! UI layout and rendering logic for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::app::App;
use crate::{
    utils::unicode::display_width,
    view::{Body, OutputBlock, Severity, StageSection, ViewModel},
};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Panes
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    // Output gets slightly more room than input
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(2, 5), Constraint::Ratio(3, 5)])
        .split(main_layout[0]);

    render_input_area(frame, app, panes[0]);
    render_output_area(frame, app, panes[1]);
    render_status_bar(frame, app, main_layout[1]);

    if app.show_help {
        render_help_overlay(frame);
    }
}

/// Render the code editor
fn render_input_area(frame: &mut Frame, app: &App, area: Rect) {
    let language = app.session.selected_language();
    let title = format!("Input | {} (Ctrl+N/P to change)", language);

    let code = app.session.code();
    let text = if code.is_empty() {
        Text::from(Line::from(Span::styled(
            format!("Paste or type your {} code here...", language),
            Style::default().fg(Color::DarkGray),
        )))
    } else {
        Text::from(code.to_string())
    };

    // Keep the cursor row inside the visible window
    let (row, col) = app.cursor_position();
    let visible_rows = area.height.saturating_sub(2) as usize;
    let scroll_y = row.saturating_sub(visible_rows.saturating_sub(1));

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((scroll_y as u16, 0));
    frame.render_widget(paragraph, area);

    // Stay in usize until the bounds check; lines can exceed u16 columns
    let line = code.split('\n').nth(row).unwrap_or("");
    let x = area.x as usize + 1 + display_width(line, col);
    let y = area.y as usize + 1 + (row - scroll_y);
    if x < area.right().saturating_sub(1) as usize && y < area.bottom().saturating_sub(1) as usize {
        frame.set_cursor_position(Position::new(x as u16, y as u16));
    }
}

/// Render the output pane from the view model
fn render_output_area(frame: &mut Frame, app: &App, area: Rect) {
    let vm = app.view_model();
    let paragraph = Paragraph::new(Text::from(output_lines(&vm, app.tick)))
        .block(Block::default().borders(Borders::ALL).title("Output"))
        .wrap(Wrap { trim: false })
        .scroll((app.output_scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Styled lines for a view model. `tick` drives the spinner.
pub fn output_lines(vm: &ViewModel, tick: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if let Some(language) = vm.running {
        lines.push(Line::from(Span::styled(
            format!("{} Running {} code...", SPINNER[tick % SPINNER.len()], language),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    for text_line in vm.banner.text.lines() {
        lines.push(Line::from(Span::styled(
            text_line.to_string(),
            severity_style(vm.banner.severity).add_modifier(Modifier::BOLD),
        )));
    }

    if let Some(runtime) = &vm.runtime {
        lines.push(Line::from(Span::styled(
            format!("Ran on {}", runtime),
            severity_style(Severity::Neutral),
        )));
    }

    match &vm.body {
        Body::Empty | Body::Failure => {}
        Body::NoOutput { notice } => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(notice.clone(), severity_style(Severity::Info))));
        }
        Body::Sections(sections) => {
            for section in sections {
                lines.push(Line::from(""));
                push_section(&mut lines, section);
            }
        }
    }
    lines
}

fn push_section(lines: &mut Vec<Line<'static>>, section: &StageSection) {
    let marker = if section.expanded { "▼" } else { "▶" };
    lines.push(Line::from(Span::styled(
        format!("{} {}", marker, section.stage.title()),
        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )));

    for block in [&section.stdout, &section.stderr].into_iter().flatten() {
        push_block(lines, block);
    }

    lines.push(Line::from(Span::styled(
        section.exit.text.clone(),
        severity_style(section.exit.severity),
    )));
}

fn push_block(lines: &mut Vec<Line<'static>>, block: &OutputBlock) {
    lines.push(Line::from(Span::styled(block.label, severity_style(block.severity))));
    for text_line in block.text.lines() {
        lines.push(Line::from(Span::styled(
            format!("  {}", text_line),
            Style::default().fg(Color::White),
        )));
    }
}

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Neutral => Style::default().fg(Color::Gray),
        Severity::Info => Style::default().fg(Color::Cyan),
        Severity::Success => Style::default().fg(Color::Green),
        Severity::Warning => Style::default().fg(Color::Yellow),
        Severity::Error => Style::default().fg(Color::Red),
    }
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let paragraph = match app.active_toast() {
        Some(toast) => Paragraph::new(toast.text.clone())
            .style(Style::default().bg(Color::Yellow).fg(Color::Black)),
        None => Paragraph::new(app.status_message())
            .style(Style::default().bg(Color::DarkGray).fg(Color::White)),
    };
    frame.render_widget(paragraph, area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame) {
    let popup_area = centered_rect(70, 70, frame.area());

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let help_lines = vec![
        Line::from("Code Runner Help"),
        Line::from(""),
        Line::from("Actions:"),
        Line::from("  Ctrl+R / F5  - Run code"),
        Line::from("  Ctrl+L       - Clear code and output"),
        Line::from("  Ctrl+E       - Load example for the language"),
        Line::from("  Ctrl+N       - Next language"),
        Line::from("  Ctrl+P       - Previous language"),
        Line::from(""),
        Line::from("Editing:"),
        Line::from("  Arrows, Home, End, Enter, Tab, Backspace, Delete"),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  PgUp/PgDn    - Scroll output"),
        Line::from("  F1           - Toggle this help"),
        Line::from("  Esc / Ctrl+C twice - Quit"),
    ];

    let help_paragraph = Paragraph::new(Text::from(help_lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .title_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help_paragraph, popup_area);
}

/// Helper function to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
