use std::collections::HashSet;

use thiserror::Error;

use crate::category::Category;
use crate::deck::DeckEntry;
use crate::stats::StatsStore;
use crate::summary::Summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress(usize),
    Finished,
}

/// The locked-in answer for one deck position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerState {
    /// original 1-based choice index
    pub choice: u8,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Recorded(AnswerState),
    /// The position was answered before; nothing changed
    AlreadyAnswered,
    NotInProgress,
    OutOfRange,
    InvalidChoice,
}

/// Result of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved(usize),
    Finished,
    Rejected,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error("no questions available for session")]
    EmptyDeck,
    #[error("question \"{0}\" appears twice in the deck")]
    DuplicateQuestion(String),
    #[error("session already started")]
    AlreadyStarted,
}

/// One pass through a sampled deck
///
/// Answers are locked once given: `answers[i]` goes from `None` to `Some` at
/// most once and `answers.len() == deck.len()` at all times.
#[derive(Debug, Clone)]
pub struct Session {
    category: Option<Category>,
    deck: Vec<DeckEntry>,
    answers: Vec<Option<AnswerState>>,
    phase: Phase,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            category: None,
            deck: Vec::new(),
            answers: Vec::new(),
            phase: Phase::NotStarted,
        }
    }

    /// NotStarted -> InProgress(0) with a pre-sampled deck
    pub fn start(&mut self, category: Category, deck: Vec<DeckEntry>) -> Result<(), SessionError> {
        if self.phase != Phase::NotStarted {
            return Err(SessionError::AlreadyStarted);
        }
        if deck.is_empty() {
            return Err(SessionError::EmptyDeck);
        }
        let mut seen = HashSet::new();
        for entry in &deck {
            if !seen.insert(entry.id()) {
                return Err(SessionError::DuplicateQuestion(entry.id().to_string()));
            }
        }

        log::info!("starting {} with {} questions", category.key, deck.len());
        self.answers = vec![None; deck.len()];
        self.deck = deck;
        self.category = Some(category);
        self.phase = Phase::InProgress(0);
        Ok(())
    }

    /// Discard everything and go back to NotStarted
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    pub fn deck(&self) -> &[DeckEntry] {
        &self.deck
    }

    pub fn answers(&self) -> &[Option<AnswerState>] {
        &self.answers
    }

    pub fn len(&self) -> usize {
        self.deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    pub fn position(&self) -> Option<usize> {
        match self.phase {
            Phase::InProgress(pos) => Some(pos),
            _ => None,
        }
    }

    pub fn current(&self) -> Option<&DeckEntry> {
        self.position().and_then(|pos| self.deck.get(pos))
    }

    pub fn answer_at(&self, position: usize) -> Option<AnswerState> {
        self.answers.get(position).copied().flatten()
    }

    pub fn is_last(&self) -> bool {
        self.position().is_some_and(|pos| pos + 1 == self.deck.len())
    }

    /// Lock in an answer for a position and record it in the stats store
    ///
    /// A position can be answered once; later calls return `AlreadyAnswered`
    /// and leave both the session and the store untouched.
    pub fn answer(
        &mut self,
        position: usize,
        choice: u8,
        store: &mut dyn StatsStore,
    ) -> AnswerOutcome {
        if !matches!(self.phase, Phase::InProgress(_)) {
            return AnswerOutcome::NotInProgress;
        }
        let Some(entry) = self.deck.get(position) else {
            return AnswerOutcome::OutOfRange;
        };
        if self.answers[position].is_some() {
            return AnswerOutcome::AlreadyAnswered;
        }
        if entry.record.choice_text(choice).is_none() {
            return AnswerOutcome::InvalidChoice;
        }

        let state = AnswerState {
            choice,
            is_correct: entry.record.is_correct(choice),
        };

        if let Some(category) = &self.category {
            if let Err(e) = store.record(&category.key, entry.id(), state.is_correct) {
                log::warn!("failed to record answer for {}: {e}", entry.id());
            }
        }

        self.answers[position] = Some(state);
        AnswerOutcome::Recorded(state)
    }

    /// Answer the current question by the 0-based position the choice is displayed at
    pub fn answer_displayed(&mut self, display_pos: usize, store: &mut dyn StatsStore) -> AnswerOutcome {
        let Some(pos) = self.position() else {
            return AnswerOutcome::NotInProgress;
        };
        match self.deck[pos].original_index(display_pos) {
            Some(choice) => self.answer(pos, choice, store),
            None => AnswerOutcome::InvalidChoice,
        }
    }

    /// Move on once the current question is answered; past the last one the session finishes
    pub fn advance(&mut self) -> Transition {
        let Phase::InProgress(pos) = self.phase else {
            return Transition::Rejected;
        };
        if self.answers[pos].is_none() {
            return Transition::Rejected;
        }
        if pos + 1 < self.deck.len() {
            self.phase = Phase::InProgress(pos + 1);
            Transition::Moved(pos + 1)
        } else {
            log::info!("finished with {}/{}", self.score(), self.deck.len());
            self.phase = Phase::Finished;
            Transition::Finished
        }
    }

    pub fn back(&mut self) -> Transition {
        match self.phase {
            Phase::InProgress(pos) if pos > 0 => {
                self.phase = Phase::InProgress(pos - 1);
                Transition::Moved(pos - 1)
            }
            _ => Transition::Rejected,
        }
    }

    /// Free navigation; answered state does not matter
    pub fn goto(&mut self, position: usize) -> Transition {
        match self.phase {
            Phase::InProgress(_) if position < self.deck.len() => {
                self.phase = Phase::InProgress(position);
                Transition::Moved(position)
            }
            _ => Transition::Rejected,
        }
    }

    /// Circular scan after the current position for the next wrong answer
    pub fn jump_to_next_wrong(&mut self) -> Transition {
        let Phase::InProgress(pos) = self.phase else {
            return Transition::Rejected;
        };
        let len = self.deck.len();
        let target = (1..=len)
            .map(|k| (pos + k) % len)
            .find(|&idx| matches!(self.answers[idx], Some(a) if !a.is_correct));

        match target {
            Some(idx) => {
                self.phase = Phase::InProgress(idx);
                Transition::Moved(idx)
            }
            None => Transition::Rejected,
        }
    }

    pub fn score(&self) -> usize {
        self.answers
            .iter()
            .filter(|a| matches!(a, Some(a) if a.is_correct))
            .count()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn unanswered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_none()).count()
    }

    pub fn wrong_count(&self) -> usize {
        self.answers
            .iter()
            .filter(|a| matches!(a, Some(a) if !a.is_correct))
            .count()
    }

    /// True once anything has been answered; discarding then needs confirmation
    pub fn has_answers(&self) -> bool {
        self.answers.iter().any(Option::is_some)
    }

    pub fn summary(&self) -> Summary {
        Summary::from_session(self)
    }
}
