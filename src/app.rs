use std::sync::mpsc::Sender;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::category::{self, Category};
use crate::config::Config;
use crate::loader::{draw_deck, spawn_load, LoadGuard, LoadOutcome};
use crate::runtime::QuizEvent;
use crate::sampler::{selector_for, DeckSelector};
use crate::session::{AnswerOutcome, Phase, Session, Transition};
use crate::source::QuestionSource;
use crate::stats::StatsStore;

pub const LOADING_MESSAGE: &str = "Loading...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Screen {
    Top,
    Quiz,
    Results,
}

/// What the event loop should do after handling an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

pub struct App {
    pub screen: Screen,
    pub categories: Vec<Category>,
    /// highlighted row on the top screen
    pub selected: usize,
    pub message: Option<String>,
    pub session: Session,
    /// set while the discard-answers prompt is shown
    pub confirm_discard: bool,
    pub review_scroll: usize,
    max_questions: usize,
    stats: Box<dyn StatsStore>,
    source: Arc<dyn QuestionSource>,
    selector: Box<dyn DeckSelector>,
    guard: LoadGuard,
    last_category: Option<Category>,
}

impl App {
    pub fn new(config: &Config, stats: Box<dyn StatsStore>, source: Arc<dyn QuestionSource>) -> Self {
        let categories: Vec<Category> = category::enabled(&config.categories)
            .into_iter()
            .cloned()
            .collect();
        let message = if categories.is_empty() {
            Some("No categories are enabled (check the config file)".to_string())
        } else {
            None
        };

        Self {
            screen: Screen::Top,
            categories,
            selected: 0,
            message,
            session: Session::new(),
            confirm_discard: false,
            review_scroll: 0,
            max_questions: config.max_questions,
            stats,
            source,
            selector: selector_for(config.random_selection),
            guard: LoadGuard::new(),
            last_category: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.guard.is_pending()
    }

    pub fn stats(&self) -> &dyn StatsStore {
        self.stats.as_ref()
    }

    /// Kick off a background load; ignored while another load is pending
    pub fn start_category(&mut self, category: Category, tx: &Sender<QuizEvent>) {
        let Some(ticket) = self.guard.begin() else {
            log::debug!("ignoring start of {} while a load is pending", category.key);
            return;
        };
        self.message = Some(LOADING_MESSAGE.to_string());
        self.last_category = Some(category.clone());
        spawn_load(Arc::clone(&self.source), category, ticket, tx.clone());
    }

    /// Start a category named on the command line, if it is known and enabled
    pub fn auto_start(&mut self, key: &str, tx: &Sender<QuizEvent>) -> bool {
        match category::find_enabled(&self.categories, key) {
            Some(cat) => {
                let cat = cat.clone();
                self.selected = self.categories.iter().position(|c| c.key == key).unwrap_or(0);
                self.start_category(cat, tx);
                true
            }
            None => {
                log::info!("no enabled category named {key}");
                false
            }
        }
    }

    pub fn on_loaded(&mut self, outcome: LoadOutcome) {
        if !self.guard.finish(outcome.ticket) {
            log::debug!("dropping stale load of {}", outcome.category.key);
            return;
        }

        let pool = match outcome.result {
            Ok(pool) => pool,
            Err(e) => {
                self.message = Some(format!("Error: {e}"));
                self.session.reset();
                self.review_scroll = 0;
                self.switch_to(Screen::Top);
                return;
            }
        };

        let stats = self.stats.load(&outcome.category.key);
        let deck = draw_deck(&pool, &stats, self.selector.as_ref(), self.max_questions);

        self.session.reset();
        match self.session.start(outcome.category, deck) {
            Ok(()) => {
                self.message = None;
                self.review_scroll = 0;
                self.switch_to(Screen::Quiz);
            }
            Err(e) => {
                self.message = Some(format!("Error: {e}"));
                self.review_scroll = 0;
                self.switch_to(Screen::Top);
            }
        }
    }

    /// Leave the current session. With `confirm` set and answers on the
    /// board, this only raises the discard prompt.
    pub fn back_to_top(&mut self, confirm: bool) {
        if confirm && self.session.has_answers() {
            self.confirm_discard = true;
            return;
        }
        self.confirm_discard = false;
        if self.guard.is_pending() {
            // a restart still loading would otherwise pull us back into a quiz
            self.guard.abandon();
            self.message = None;
        }
        self.session.reset();
        self.review_scroll = 0;
        self.switch_to(Screen::Top);
    }

    fn switch_to(&mut self, screen: Screen) {
        if self.screen != screen {
            log::debug!("screen {} -> {}", self.screen, screen);
        }
        self.screen = screen;
    }

    pub fn restart(&mut self, tx: &Sender<QuizEvent>) {
        match self.last_category.clone() {
            Some(cat) => self.start_category(cat, tx),
            None => self.back_to_top(false),
        }
    }

    pub fn on_event(&mut self, event: QuizEvent, tx: &Sender<QuizEvent>) -> Action {
        match event {
            QuizEvent::Key(key) => self.on_key(key, tx),
            QuizEvent::Loaded(outcome) => {
                self.on_loaded(outcome);
                Action::Continue
            }
            QuizEvent::Resize | QuizEvent::Tick => Action::Continue,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, tx: &Sender<QuizEvent>) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        if self.confirm_discard {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.back_to_top(false),
                KeyCode::Char('n') | KeyCode::Esc => self.confirm_discard = false,
                _ => {}
            }
            return Action::Continue;
        }

        match self.screen {
            Screen::Top => self.on_top_key(key, tx),
            Screen::Quiz => {
                self.on_quiz_key(key);
                Action::Continue
            }
            Screen::Results => self.on_results_key(key, tx),
        }
    }

    fn on_top_key(&mut self, key: KeyEvent, tx: &Sender<QuizEvent>) -> Action {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.categories.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(cat) = self.categories.get(self.selected).cloned() {
                    self.start_category(cat, tx);
                }
            }
            _ => {}
        }
        Action::Continue
    }

    fn on_quiz_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c @ '1'..='4') => {
                self.answer_displayed(c as usize - '1' as usize);
            }
            KeyCode::Char(c @ 'a'..='d') => {
                self.answer_displayed(c as usize - 'a' as usize);
            }
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('n') => {
                if self.session.advance() == Transition::Finished {
                    self.review_scroll = 0;
                    self.switch_to(Screen::Results);
                }
            }
            KeyCode::Left | KeyCode::Char('p') => {
                self.session.back();
            }
            KeyCode::Char('w') => {
                self.session.jump_to_next_wrong();
            }
            KeyCode::Tab => {
                if let Some(pos) = self.session.position() {
                    self.session.goto((pos + 1) % self.session.len());
                }
            }
            KeyCode::BackTab => {
                if let Some(pos) = self.session.position() {
                    let len = self.session.len();
                    self.session.goto((pos + len - 1) % len);
                }
            }
            KeyCode::Home => {
                self.session.goto(0);
            }
            KeyCode::End => {
                self.session.goto(self.session.len().saturating_sub(1));
            }
            KeyCode::Esc | KeyCode::Char('t') => self.back_to_top(true),
            _ => {}
        }
    }

    fn answer_displayed(&mut self, display_pos: usize) {
        let outcome = self.session.answer_displayed(display_pos, self.stats.as_mut());
        if let AnswerOutcome::Recorded(state) = outcome {
            log::debug!("answered choice {} correct={}", state.choice, state.is_correct);
        }
    }

    fn on_results_key(&mut self, key: KeyEvent, tx: &Sender<QuizEvent>) -> Action {
        match key.code {
            KeyCode::Char('q') => return Action::Quit,
            KeyCode::Char('r') => self.restart(tx),
            KeyCode::Esc | KeyCode::Char('t') => self.back_to_top(false),
            KeyCode::Up | KeyCode::Char('k') => {
                self.review_scroll = self.review_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.review_scroll + 1 < self.session.len() {
                    self.review_scroll += 1;
                }
            }
            _ => {}
        }
        Action::Continue
    }

    pub fn in_progress(&self) -> bool {
        matches!(self.session.phase(), Phase::InProgress(_))
    }
}
