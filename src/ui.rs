pub mod format;
pub mod quiz;
pub mod results;
pub mod screen;
pub mod top;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::app::App;

pub(crate) const HORIZONTAL_MARGIN: u16 = 5;
pub(crate) const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_view(self.screen).render(self, area, buf);

        if self.confirm_discard {
            render_confirm_discard(area, buf);
        }
    }
}

pub(crate) fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub(crate) fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

pub(crate) fn legend_style() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC)
}

/// Rect of `width` x `height` centered in `area`, clamped to fit
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height - height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width - width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1])[1]
}

fn render_confirm_discard(area: Rect, buf: &mut Buffer) {
    let popup = centered_rect(50, 5, area);
    Clear.render(popup, buf);

    Paragraph::new("Going back to the top discards your answers.\n(y)es / (n)o")
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Discard answers?")
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .style(bold())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(popup, buf);
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_centered_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered_rect(50, 5, area);
        assert_eq!(rect.width, 50);
        assert_eq!(rect.height, 5);
        assert_eq!(rect.x, 15);

        let tiny = centered_rect(50, 5, Rect::new(0, 0, 10, 3));
        assert!(tiny.width <= 10 && tiny.height <= 3);
    }

    #[test]
    fn test_confirm_dialog_overlays_screen() {
        let mut app = app_with_sample();
        app.confirm_discard = true;
        let lines = render_lines(&app, 80, 24);
        assert!(contains(&lines, "Discard answers?"));
        assert!(contains(&lines, "(y)es / (n)o"));
    }

    #[test]
    fn test_renders_in_tiny_area_without_panic() {
        let app = app_with_sample();
        for (w, h) in [(1, 1), (10, 3), (20, 5)] {
            let _ = render_lines(&app, w, h);
        }
    }
}
