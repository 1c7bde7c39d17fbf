//! Left column: wallet, contract funds, add form and pay day.

use crate::app::{App, Focus};
use payroll_client::TOKEN_SYMBOL;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Wallet
            Constraint::Length(3), // Funds
            Constraint::Length(6), // Add employee
            Constraint::Min(4),    // Pay day
        ])
        .split(area);

    render_wallet(frame, app, chunks[0]);
    render_funds(frame, app, chunks[1]);
    render_form(frame, app, chunks[2]);
    render_payday(frame, app, chunks[3]);
}

pub fn render_disconnected(frame: &mut Frame, app: &App, area: Rect) {
    let message = app.snapshot.roster_placeholder().unwrap_or_default();
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from(Span::styled(
            "[ Connect Wallet ]",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    let panel = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Wallet "));
    frame.render_widget(panel, area);
}

fn render_wallet(frame: &mut Frame, app: &App, area: Rect) {
    let account = app
        .snapshot
        .account
        .map(|a| a.to_string())
        .unwrap_or_default();
    let line = Line::from(vec![
        Span::raw(" Connected: "),
        Span::styled(account, Style::default().fg(Color::Green)),
        Span::styled("  [ Disconnect ]", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(" Wallet ")),
        area,
    );
}

fn render_funds(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(
            app.snapshot.funds_display(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {TOKEN_SYMBOL}")),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Contract Funds "),
        ),
        area,
    );
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let field = |label: &'static str, value: &str, focus: Focus| {
        let focused = app.focus == focus;
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let cursor = if focused { "_" } else { "" };
        Line::from(vec![
            Span::raw(format!(" {label:<16}")),
            Span::styled(format!("{value}{cursor}"), style),
        ])
    };

    let disabled = app.snapshot.writes_disabled();
    let text = vec![
        field("Wallet address:", &app.form.address, Focus::Address),
        field("Monthly salary:", &app.form.salary, Focus::Salary),
        Line::from(""),
        button(app.add_button_label(), disabled, Color::Blue),
    ];
    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Add New Employee "),
        ),
        area,
    );
}

fn render_payday(frame: &mut Frame, app: &App, area: Rect) {
    let snapshot = &app.snapshot;
    let mut text = vec![button(
        app.pay_button_label(),
        snapshot.writes_disabled(),
        Color::Green,
    )];

    if !snapshot.pending.is_empty() {
        text.push(Line::from(""));
        for tx in &snapshot.pending {
            text.push(Line::from(vec![
                Span::raw(" "),
                Span::styled(tx.hash.short(), Style::default().fg(Color::Yellow)),
                Span::raw(format!(" {}", tx.action.confirming_label())),
            ]));
        }
    }

    frame.render_widget(
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" Pay Day ")),
        area,
    );
}

fn button(label: &'static str, disabled: bool, color: Color) -> Line<'static> {
    let style = if disabled {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    };
    Line::from(Span::styled(format!(" [ {label} ]"), style))
}
