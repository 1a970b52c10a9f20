use ratatui::{buffer::Buffer, layout::Rect};

use crate::app::{App, Screen};
use crate::ui::{quiz, results, top};

/// A UI screen boundary: responsible for rendering one app screen
pub trait View {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Category list, loading indicator and load errors
pub struct TopView;

impl View for TopView {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        top::render_top(app, area, buf);
    }
}

pub struct QuizView;

impl View for QuizView {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        quiz::render_quiz(app, area, buf);
    }
}

pub struct ResultsView;

impl View for ResultsView {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        results::render_results(app, area, buf);
    }
}

/// Helper to construct the appropriate view for the current screen
pub fn current_view(screen: Screen) -> Box<dyn View> {
    match screen {
        Screen::Top => Box::new(TopView),
        Screen::Quiz => Box::new(QuizView),
        Screen::Results => Box::new(ResultsView),
    }
}
