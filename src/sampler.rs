use rand::seq::SliceRandom;
use rand::Rng;

use crate::question::QuestionRecord;
use crate::stats::{AnswerStat, StatsMap};

/// Tunables for accuracy-driven weighting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightParams {
    /// Weight of a question that has never been answered
    pub unseen: f64,
    /// Exponent applied to the miss rate
    pub gamma: f64,
    /// Floor added to every answered question so mastered ones stay drawable
    pub eps: f64,
}

impl Default for WeightParams {
    fn default() -> Self {
        Self {
            unseen: 1.5,
            gamma: 2.0,
            eps: 0.05,
        }
    }
}

impl WeightParams {
    pub fn weight(&self, stat: Option<&AnswerStat>) -> f64 {
        match stat.and_then(AnswerStat::accuracy) {
            None => self.unseen,
            Some(p) => (1.0 - p).powf(self.gamma) + self.eps,
        }
    }
}

/// Weighted sampling without replacement: each draw picks from the remaining
/// pool with probability proportional to weight, then removes the pick.
///
/// Returns `min(k, questions.len())` distinct questions in draw order. Weights
/// are computed once up front from `stats`.
pub fn pick_weighted_unique<'q, R: Rng>(
    questions: &'q [QuestionRecord],
    stats: &StatsMap,
    k: usize,
    params: &WeightParams,
    rng: &mut R,
) -> Vec<&'q QuestionRecord> {
    let mut pool: Vec<(&QuestionRecord, f64)> = questions
        .iter()
        .map(|q| (q, params.weight(stats.get(&q.id))))
        .collect();

    let n = k.min(pool.len());
    let mut picked = Vec::with_capacity(n);

    for _ in 0..n {
        let total: f64 = pool.iter().map(|(_, w)| w).sum();
        let mut r = rng.gen::<f64>() * total;

        let mut idx = 0;
        while idx < pool.len() {
            r -= pool[idx].1;
            if r <= 0.0 {
                break;
            }
            idx += 1;
        }

        let (q, _) = pool.remove(idx.min(pool.len() - 1));
        picked.push(q);
    }

    picked
}

/// Strategy for drawing a deck out of a category's question pool
pub trait DeckSelector: Send {
    fn select<'q>(
        &self,
        questions: &'q [QuestionRecord],
        stats: &StatsMap,
        count: usize,
    ) -> Vec<&'q QuestionRecord>;
}

/// Uniform selection, ignoring history
pub struct RandomSelector;

impl DeckSelector for RandomSelector {
    fn select<'q>(
        &self,
        questions: &'q [QuestionRecord],
        _stats: &StatsMap,
        count: usize,
    ) -> Vec<&'q QuestionRecord> {
        let mut rng = rand::thread_rng();
        questions.choose_multiple(&mut rng, count).collect()
    }
}

/// Selection biased toward questions answered poorly in the past
#[derive(Default)]
pub struct WeightedSelector {
    pub params: WeightParams,
}

impl DeckSelector for WeightedSelector {
    fn select<'q>(
        &self,
        questions: &'q [QuestionRecord],
        stats: &StatsMap,
        count: usize,
    ) -> Vec<&'q QuestionRecord> {
        let mut rng = rand::thread_rng();
        pick_weighted_unique(questions, stats, count, &self.params, &mut rng)
    }
}

pub fn selector_for(random: bool) -> Box<dyn DeckSelector> {
    if random {
        Box::new(RandomSelector)
    } else {
        Box::new(WeightedSelector::default())
    }
}
