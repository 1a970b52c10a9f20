use rand::seq::SliceRandom;
use rand::Rng;

use crate::question::{QuestionRecord, CHOICE_COUNT};

/// A question as presented in one session, with its choices in a fixed shuffled order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub record: QuestionRecord,
    /// display position -> original 1-based choice index
    order: [u8; CHOICE_COUNT],
}

impl DeckEntry {
    pub fn new<R: Rng>(record: QuestionRecord, rng: &mut R) -> Self {
        let mut order = [1, 2, 3, 4];
        order.shuffle(rng);
        Self { record, order }
    }

    /// Build an entry with an explicit display order
    pub fn with_order(record: QuestionRecord, order: [u8; CHOICE_COUNT]) -> Self {
        debug_assert!({
            let mut sorted = order;
            sorted.sort_unstable();
            sorted == [1, 2, 3, 4]
        });
        Self { record, order }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn order(&self) -> &[u8; CHOICE_COUNT] {
        &self.order
    }

    /// Original 1-based choice index shown at a 0-based display position
    pub fn original_index(&self, display_pos: usize) -> Option<u8> {
        self.order.get(display_pos).copied()
    }

    /// Choices in display order as (original index, text)
    pub fn display_choices(&self) -> impl Iterator<Item = (u8, &str)> + '_ {
        self.order
            .iter()
            .map(move |&idx| (idx, self.record.choice_text(idx).unwrap_or_default()))
    }
}

/// Turn a sampled selection into a deck, shuffling each question's choices once
pub fn build_deck<R: Rng>(selected: &[&QuestionRecord], rng: &mut R) -> Vec<DeckEntry> {
    selected
        .iter()
        .map(|&q| DeckEntry::new(q.clone(), rng))
        .collect()
}
