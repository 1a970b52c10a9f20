use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::app::App;
use crate::summary::{ReviewBadge, ReviewItem, Summary};
use crate::ui::{bold, dim, legend_style, HORIZONTAL_MARGIN, VERTICAL_MARGIN};

pub fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let summary = app.session.summary();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    Paragraph::new(Span::styled(summary.category_title.as_str(), dim()))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let headline_style = if summary.is_perfect() {
        bold().fg(Color::Green)
    } else {
        bold()
    };
    Paragraph::new(Span::styled(summary.headline(), headline_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        format!("Unanswered: {} | Wrong: {}", summary.unanswered, summary.wrong),
        dim(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(review_lines(&summary, app.review_scroll))
        .wrap(Wrap { trim: false })
        .render(chunks[3], buf);

    let footer = match (&app.message, app.is_loading()) {
        (Some(message), true) => Span::styled(message.as_str(), Style::default().fg(Color::Yellow)),
        _ => Span::styled("(r)estart / (t)op / (↑/↓) scroll / (q)uit", legend_style()),
    };
    Paragraph::new(footer)
        .alignment(Alignment::Center)
        .render(chunks[4], buf);
}

fn review_lines(summary: &Summary, scroll: usize) -> Vec<Line<'_>> {
    summary
        .items
        .iter()
        .skip(scroll)
        .flat_map(review_item)
        .collect()
}

fn review_item(item: &ReviewItem) -> Vec<Line<'_>> {
    let badge_color = match item.badge {
        ReviewBadge::Correct => Color::Green,
        ReviewBadge::Wrong => Color::Red,
        ReviewBadge::Unanswered => Color::Yellow,
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("Q{} ", item.number), bold()),
        Span::styled(item.badge.symbol(), bold().fg(badge_color)),
        Span::raw(" "),
        Span::raw(item.question.as_str()),
    ])];

    let yours = match &item.your_answer {
        Some(text) => Span::raw(text.as_str()),
        None => Span::styled("(unanswered)", dim()),
    };
    lines.push(Line::from(vec![Span::styled("    Yours:   ", dim()), yours]));
    lines.push(Line::from(vec![
        Span::styled("    Answer:  ", dim()),
        Span::raw(item.correct_answer.as_str()),
    ]));
    if !item.explanation.is_empty() {
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(item.explanation.as_str(), dim()),
        ]));
    }
    lines.push(Line::default());
    lines
}

#[cfg(test)]
mod tests {
    use crate::app::{Screen, LOADING_MESSAGE};
    use crate::category::Category;
    use crate::deck::DeckEntry;
    use crate::question::sample_record;
    use crate::stats::MemoryStatsStore;
    use crate::ui::test_support::*;

    fn finished_app() -> crate::app::App {
        let mut app = app_with_sample();
        let deck = vec![
            DeckEntry::with_order(sample_record("q1", 1), [1, 2, 3, 4]),
            DeckEntry::with_order(sample_record("q2", 2), [1, 2, 3, 4]),
            DeckEntry::with_order(sample_record("q3", 3), [1, 2, 3, 4]),
        ];
        app.session
            .start(Category::new("k", "Kanji", "1", true), deck)
            .unwrap();
        let mut store = MemoryStatsStore::new();
        app.session.answer(1, 4, &mut store);
        app.session.answer(2, 3, &mut store);
        app.session.goto(2);
        app.session.advance();
        app.screen = Screen::Results;
        app
    }

    #[test]
    fn test_summary_counts() {
        let app = finished_app();
        let lines = render_lines(&app, 80, 30);
        assert!(contains(&lines, "Kanji"));
        assert!(contains(&lines, "Score: 1 / 3"));
        assert!(contains(&lines, "Unanswered: 1 | Wrong: 1"));
        assert!(contains(&lines, "(r)estart"));
    }

    #[test]
    fn test_review_lists_answers() {
        let app = finished_app();
        let lines = render_lines(&app, 80, 30);
        assert!(contains(&lines, "question q1"));
        assert!(contains(&lines, "Yours:   q2-d"));
        assert!(contains(&lines, "Answer:  q2-b"));
        assert!(contains(&lines, "(unanswered)"));
    }

    #[test]
    fn test_restart_shows_loading_in_footer() {
        let mut app = finished_app();
        let (tx, _rx) = std::sync::mpsc::channel();
        app.start_category(Category::sample(), &tx);
        assert_eq!(app.screen, Screen::Results);

        let lines = render_lines(&app, 80, 30);
        assert!(contains(&lines, LOADING_MESSAGE));
        assert!(!contains(&lines, "(r)estart"));
    }

    #[test]
    fn test_scroll_skips_leading_items() {
        let mut app = finished_app();
        app.review_scroll = 2;
        let lines = render_lines(&app, 80, 30);
        assert!(!contains(&lines, "question q1"));
        assert!(contains(&lines, "question q3"));
    }
}
