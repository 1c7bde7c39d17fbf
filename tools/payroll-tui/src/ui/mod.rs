//! UI module for TUI rendering.

pub mod panels;
pub mod popup;
pub mod roster;

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the whole page.
pub fn render(frame: &mut Frame, app: &App) {
    let snapshot = &app.snapshot;
    let banner_height = if snapshot.notice.is_some() || snapshot.last_error.is_some() {
        3
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Header
            Constraint::Length(banner_height), // Notice / error
            Constraint::Min(10),               // Body
            Constraint::Length(3),             // Footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_banner(frame, app, chunks[1]);

    if snapshot.is_connected() {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[2]);
        panels::render(frame, app, body[0]);
        roster::render(frame, app, body[1]);
    } else {
        panels::render_disconnected(frame, app, chunks[2]);
    }

    render_footer(frame, app, chunks[3]);

    if let Some(alert) = &snapshot.alert {
        popup::render_alert(frame, alert);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (symbol, color) = if app.snapshot.is_connected() {
        ("●", Color::Green)
    } else {
        ("○", Color::Red)
    };

    let header = Paragraph::new(Line::from(vec![
        Span::raw(" Network: "),
        Span::styled(app.network.name(), Style::default().fg(Color::Cyan)),
        Span::raw("    Contract: "),
        Span::styled(app.contract.to_string(), Style::default().fg(Color::Cyan)),
        Span::raw("    "),
        Span::styled(symbol, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Simple Payroll DApp "),
    );

    frame.render_widget(header, area);
}

fn render_banner(frame: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 {
        return;
    }
    let snapshot = &app.snapshot;
    let line = match (&snapshot.notice, &snapshot.last_error) {
        (Some(notice), _) => Line::from(Span::styled(
            format!(" {notice}"),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        (None, Some(error)) => Line::from(Span::styled(
            format!(" {error}"),
            Style::default().fg(Color::Red),
        )),
        (None, None) => return,
    };

    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help = if !app.snapshot.is_connected() {
        " [C] Connect Wallet  [Q] Quit"
    } else if app.focus == crate::app::Focus::Roster {
        " [A] Address  [S] Salary  [P] Pay  [D] Remove  [↑↓] Select  [R] Refresh  [X] Disconnect  [Q] Quit"
    } else {
        " [Tab] Next field  [Enter] Add Employee  [Esc] Done"
    };

    let footer = Paragraph::new(Line::from(vec![Span::styled(
        help,
        Style::default().fg(Color::DarkGray),
    )]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}
