use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::deck::DeckEntry;
use crate::session::{AnswerState, Session};
use crate::ui::format::format_question;
use crate::ui::{bold, dim, legend_style, HORIZONTAL_MARGIN, VERTICAL_MARGIN};

const NAV_CELL_WIDTH: usize = 4;

/// Rows needed to show `text` wrapped at `width` columns
fn wrapped_height(text: &str, width: u16) -> u16 {
    let width = width.max(1) as usize;
    text.split('\n')
        .map(|line| line.width().max(1).div_ceil(width))
        .sum::<usize>() as u16
}

fn nav_height(len: usize, width: u16) -> u16 {
    let per_row = (width as usize / NAV_CELL_WIDTH).max(1);
    len.div_ceil(per_row).max(1) as u16
}

pub fn render_quiz(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let (Some(pos), Some(entry)) = (session.position(), session.current()) else {
        return;
    };
    let answer = session.answer_at(pos);

    let inner_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2);
    let question = format_question(&entry.record.question);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(wrapped_height(&question, inner_width)),
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(nav_height(session.len(), inner_width)),
            Constraint::Length(1),
        ])
        .split(area);

    let title = session.category().map(|c| c.title.as_str()).unwrap_or_default();
    Paragraph::new(Line::from(vec![
        Span::styled(format!("Q{}", pos + 1), bold()),
        Span::styled(format!(" / {}", session.len()), dim()),
        Span::raw("   "),
        Span::styled(title, dim()),
    ]))
    .render(chunks[0], buf);

    Paragraph::new(Span::styled(status_line(session), dim())).render(chunks[1], buf);

    Paragraph::new(Text::from(question))
        .style(bold())
        .wrap(Wrap { trim: false })
        .render(chunks[2], buf);

    Paragraph::new(choice_lines(entry, answer))
        .wrap(Wrap { trim: true })
        .render(chunks[4], buf);

    Paragraph::new(feedback_lines(entry, answer))
        .wrap(Wrap { trim: true })
        .render(chunks[6], buf);

    Paragraph::new(nav_line(session, pos))
        .wrap(Wrap { trim: false })
        .render(chunks[7], buf);

    Paragraph::new(legend_line(session))
        .alignment(Alignment::Center)
        .render(chunks[8], buf);
}

fn status_line(session: &Session) -> String {
    [
        format!("Correct:{}", session.score()),
        format!("Unanswered:{}", session.unanswered_count()),
        format!("Wrong:{}", session.wrong_count()),
    ]
    .iter()
    .join(" | ")
}

fn choice_lines(entry: &DeckEntry, answer: Option<AnswerState>) -> Vec<Line<'_>> {
    let correct = entry.record.answer;
    entry
        .display_choices()
        .enumerate()
        .map(|(i, (idx, text))| {
            let chosen = answer.is_some_and(|a| a.choice == idx);
            let marker = if chosen { "> " } else { "  " };
            let style = match answer {
                None => Style::default(),
                Some(_) if idx == correct => bold().fg(Color::Green),
                Some(_) if chosen => bold().fg(Color::Red),
                Some(_) => dim(),
            };
            Line::from(Span::styled(format!("{marker}{}. {text}", i + 1), style))
        })
        .collect()
}

fn feedback_lines(entry: &DeckEntry, answer: Option<AnswerState>) -> Vec<Line<'_>> {
    let Some(answer) = answer else {
        return vec![Line::from(Span::styled(
            "Press 1-4 (or a-d) to answer",
            dim(),
        ))];
    };

    let verdict = if answer.is_correct {
        Span::styled("✅ Correct", bold().fg(Color::Green))
    } else {
        Span::styled("❌ Wrong", bold().fg(Color::Red))
    };
    let explanation = if entry.record.has_explanation() {
        Span::raw(entry.record.explanation.as_str())
    } else {
        Span::styled("(no explanation)", dim())
    };

    vec![
        Line::from(verdict),
        Line::from(vec![
            Span::styled("Answer: ", dim()),
            Span::raw(entry.record.answer_text()),
        ]),
        Line::from(explanation),
    ]
}

fn nav_line(session: &Session, current: usize) -> Line<'static> {
    let spans = (0..session.len())
        .map(|i| {
            let base = match session.answer_at(i) {
                None => dim(),
                Some(a) if a.is_correct => Style::default().fg(Color::Green),
                Some(_) => Style::default().fg(Color::Red),
            };
            let style = if i == current {
                base.add_modifier(Modifier::REVERSED | Modifier::BOLD)
            } else {
                base
            };
            Span::styled(format!("{:>3} ", i + 1), style)
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}

fn legend_line(session: &Session) -> Line<'static> {
    let next = if session.is_last() {
        "(enter) results"
    } else {
        "(enter) next"
    };
    let wrong_style = if session.wrong_count() == 0 {
        dim().add_modifier(Modifier::CROSSED_OUT)
    } else {
        legend_style()
    };

    Line::from(vec![
        Span::styled(format!("{next} / (←) back / (tab) skip / "), legend_style()),
        Span::styled("(w) next wrong", wrong_style),
        Span::styled(" / (esc) top", legend_style()),
    ])
}
