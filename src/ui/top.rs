use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::app::{App, LOADING_MESSAGE};
use crate::ui::{bold, dim, legend_style, HORIZONTAL_MARGIN, VERTICAL_MARGIN};

pub fn render_top(app: &App, area: Rect, buf: &mut Buffer) {
    let list_height = app.categories.len().max(1) as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(list_height),
            Constraint::Length(1),
            Constraint::Min(2),
            Constraint::Length(1),
        ])
        .split(area);

    Paragraph::new(Span::styled("sheetquiz", bold()))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    Paragraph::new(Span::styled("Choose a category", dim()))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let rows: Vec<Line> = app
        .categories
        .iter()
        .enumerate()
        .map(|(i, cat)| {
            if i == app.selected {
                Line::from(Span::styled(
                    format!("> {}", cat.title),
                    bold().fg(Color::Cyan),
                ))
            } else {
                Line::from(format!("  {}", cat.title))
            }
        })
        .collect();
    Paragraph::new(rows).render(chunks[2], buf);

    if let Some(message) = &app.message {
        let style = if message == LOADING_MESSAGE {
            Style::default().fg(Color::Yellow)
        } else if message.starts_with("Error") {
            bold().fg(Color::Red)
        } else {
            dim()
        };
        Paragraph::new(Span::styled(message.as_str(), style))
            .wrap(Wrap { trim: true })
            .render(chunks[4], buf);
    }

    Paragraph::new(Span::styled(
        "(↑/↓) select / (enter) start / (q)uit",
        legend_style(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);
}
