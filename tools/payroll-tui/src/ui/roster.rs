//! Employee roster list.

use crate::app::App;
use payroll_client::{RosterRow, RowState};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let snapshot = &app.snapshot;
    let title = match snapshot.failed_slots {
        0 => " Employee List ".to_string(),
        n => format!(" Employee List ({n} unreadable) "),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if let Some(placeholder) = snapshot.roster_placeholder() {
        let text = Paragraph::new(Line::from(Span::styled(
            format!(" {placeholder}"),
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(text, area);
        return;
    }

    let items: Vec<ListItem> = snapshot
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| ListItem::new(row_line(row, i == app.selected)))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn row_line(row: &RosterRow, selected: bool) -> Line<'static> {
    let marker = if selected { "▶ " } else { "  " };
    let address_style = if selected {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let mut spans = vec![Span::raw(marker)];
    match &row.state {
        RowState::Loading => {
            spans.push(Span::styled(
                row.loading_text(),
                Style::default().fg(Color::DarkGray),
            ));
        }
        RowState::Failed(reason) => {
            spans.push(Span::styled(row.address.to_string(), address_style));
            spans.push(Span::styled(
                format!("  unavailable: {reason}"),
                Style::default().fg(Color::Red),
            ));
        }
        RowState::Loaded(_) => {
            spans.push(Span::styled(row.address.to_string(), address_style));
            if let Some(salary) = row.salary_text() {
                spans.push(Span::styled(
                    format!("  {salary}"),
                    Style::default().fg(Color::Cyan),
                ));
            }
            if row.is_removed() {
                spans.push(Span::styled(
                    "  REMOVED",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ));
            } else if row.is_removable() {
                spans.push(Span::styled(
                    "  [ Remove ]",
                    Style::default().fg(Color::Yellow),
                ));
            }
        }
    }
    Line::from(spans)
}
