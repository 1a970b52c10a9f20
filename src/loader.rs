use std::collections::HashSet;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use crate::category::Category;
use crate::deck::{build_deck, DeckEntry};
use crate::error::QuizError;
use crate::ingest::parse_questions;
use crate::question::QuestionRecord;
use crate::runtime::QuizEvent;
use crate::sampler::DeckSelector;
use crate::source::QuestionSource;
use crate::stats::StatsMap;

/// Identifies one in-flight category load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Completion of a background load
#[derive(Debug)]
pub struct LoadOutcome {
    pub ticket: Ticket,
    pub category: Category,
    pub result: Result<Vec<QuestionRecord>, QuizError>,
}

/// Allows at most one category load in flight. A start requested while
/// another is pending is refused, and completions for anything but the
/// pending ticket are stale.
#[derive(Debug, Default)]
pub struct LoadGuard {
    next: u64,
    pending: Option<Ticket>,
}

impl LoadGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> Option<Ticket> {
        if self.pending.is_some() {
            return None;
        }
        self.next += 1;
        let ticket = Ticket(self.next);
        self.pending = Some(ticket);
        Some(ticket)
    }

    /// Accept a completion; false means it should be dropped
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Forget the pending load; its completion will be treated as stale
    pub fn abandon(&mut self) {
        self.pending = None;
    }
}

/// Fetch and validate a category's question pool
///
/// Later rows reusing an id already seen are dropped so a deck can never hold
/// the same question twice.
pub fn fetch_questions(
    source: &dyn QuestionSource,
    category: &Category,
) -> Result<Vec<QuestionRecord>, QuizError> {
    let text = source.fetch(category)?;
    let questions = parse_questions(&text)?;

    let mut seen = HashSet::new();
    let pool: Vec<QuestionRecord> = questions
        .into_iter()
        .filter(|q| {
            let fresh = seen.insert(q.id.clone());
            if !fresh {
                log::warn!("{}: skipping duplicate question id {}", category.key, q.id);
            }
            fresh
        })
        .collect();

    if pool.is_empty() {
        return Err(QuizError::EmptyPool);
    }
    Ok(pool)
}

/// Sample a deck of up to `max_questions` and shuffle each question's choices
pub fn draw_deck(
    questions: &[QuestionRecord],
    stats: &StatsMap,
    selector: &dyn DeckSelector,
    max_questions: usize,
) -> Vec<DeckEntry> {
    let selected = selector.select(questions, stats, max_questions);
    let mut rng = rand::thread_rng();
    build_deck(&selected, &mut rng)
}

/// Fetch a category on a worker thread and report back through the event channel
pub fn spawn_load(
    source: Arc<dyn QuestionSource>,
    category: Category,
    ticket: Ticket,
    tx: Sender<QuizEvent>,
) {
    thread::spawn(move || {
        let result = fetch_questions(source.as_ref(), &category);
        if let Err(e) = &result {
            log::warn!("loading {} failed: {e}", category.key);
        }
        let _ = tx.send(QuizEvent::Loaded(LoadOutcome {
            ticket,
            category,
            result,
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::WeightedSelector;
    use crate::source::{BundledSource, SourceError};
    use assert_matches::assert_matches;
    use std::sync::mpsc;
    use std::time::Duration;

    struct StaticSource(&'static str);

    impl QuestionSource for StaticSource {
        fn fetch(&self, _category: &Category) -> Result<String, SourceError> {
            Ok(self.0.to_string())
        }
    }

    const HEADER: &str = "id\tcategory\tquestion\tchoice1\tchoice2\tchoice3\tchoice4\tanswer\texplanation\n";

    #[test]
    fn test_guard_ignores_second_start_while_pending() {
        let mut guard = LoadGuard::new();
        let first = guard.begin().unwrap();
        assert!(guard.begin().is_none());
        assert!(guard.is_pending());

        assert!(guard.finish(first));
        assert!(!guard.is_pending());
        assert!(guard.begin().is_some());
    }

    #[test]
    fn test_guard_drops_stale_completions() {
        let mut guard = LoadGuard::new();
        let first = guard.begin().unwrap();
        guard.abandon();
        let second = guard.begin().unwrap();

        assert_ne!(first, second);
        assert!(!guard.finish(first));
        assert!(guard.finish(second));
    }

    #[test]
    fn test_header_only_sheet_is_an_empty_pool() {
        let source = StaticSource(HEADER);
        assert_matches!(
            fetch_questions(&source, &Category::sample()),
            Err(QuizError::EmptyPool)
        );
    }

    #[test]
    fn test_ingestion_errors_surface() {
        let source = StaticSource("id\tquestion\n1\tq");
        assert_matches!(
            fetch_questions(&source, &Category::sample()),
            Err(QuizError::Ingest(_))
        );
    }

    #[test]
    fn test_duplicate_ids_keep_first_row() {
        let source = StaticSource(
            "id\tcategory\tquestion\tchoice1\tchoice2\tchoice3\tchoice4\tanswer\texplanation\n\
             q1\tc\tfirst\ta\tb\tc\td\t1\t\n\
             q1\tc\tsecond\ta\tb\tc\td\t2\t\n\
             q2\tc\tthird\ta\tb\tc\td\t3\t",
        );
        let pool = fetch_questions(&source, &Category::sample()).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool[0].question, "first");
    }

    #[test]
    fn test_draw_deck_caps_at_max_questions() {
        let pool = fetch_questions(&BundledSource, &Category::sample()).unwrap();
        let deck = draw_deck(&pool, &StatsMap::new(), &WeightedSelector::default(), 5);
        assert_eq!(deck.len(), 5);

        let all = draw_deck(&pool, &StatsMap::new(), &WeightedSelector::default(), 25);
        assert_eq!(all.len(), pool.len());
    }

    #[test]
    fn test_spawn_load_reports_through_channel() {
        let (tx, rx) = mpsc::channel();
        let mut guard = LoadGuard::new();
        let ticket = guard.begin().unwrap();

        spawn_load(Arc::new(BundledSource), Category::sample(), ticket, tx);

        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            QuizEvent::Loaded(outcome) => {
                assert!(guard.finish(outcome.ticket));
                assert_eq!(outcome.category.key, "sample");
                assert_eq!(outcome.result.unwrap().len(), 8);
            }
            other => panic!("expected Loaded, got {other:?}"),
        }
    }
}
