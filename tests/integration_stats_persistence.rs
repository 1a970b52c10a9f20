use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

use sheetquiz::category::Category;
use sheetquiz::deck::DeckEntry;
use sheetquiz::loader::fetch_questions;
use sheetquiz::sampler::{pick_weighted_unique, WeightParams};
use sheetquiz::session::Session;
use sheetquiz::source::FileSource;
use sheetquiz::stats::{AnswerStat, SqliteStatsStore, StatsStore};

const SHEET: &str = "id\tcategory\tquestion\tchoice1\tchoice2\tchoice3\tchoice4\tanswer\texplanation
k1\tkanji\t山 reads\tyama\tkawa\tumi\tsora\t1\tmountain
k2\tkanji\t川 reads\tyama\tkawa\tumi\tsora\t2\triver
k3\tkanji\t海 reads\tyama\tkawa\tumi\tsora\t3\t
";

#[test]
fn answers_survive_reopening_the_database() {
    let dir = tempdir().unwrap();
    let sheet_path = dir.path().join("kanji.tsv");
    std::fs::write(&sheet_path, SHEET).unwrap();
    let db_path = dir.path().join("state").join("stats.db");

    let category = Category::new("kanji", "Kanji", "0", true);
    let pool = fetch_questions(&FileSource::new(&sheet_path), &category).unwrap();
    assert_eq!(pool.len(), 3);

    {
        let mut store = SqliteStatsStore::open(&db_path).unwrap();
        let deck = pool
            .iter()
            .map(|q| DeckEntry::with_order(q.clone(), [1, 2, 3, 4]))
            .collect();
        let mut session = Session::new();
        session.start(category.clone(), deck).unwrap();

        session.answer(0, 1, &mut store);
        session.answer(1, 4, &mut store);
        // locked: a second answer is not recorded
        session.answer(1, 2, &mut store);
    }

    let store = SqliteStatsStore::open(&db_path).unwrap();
    let stats = store.load("kanji");
    assert_eq!(stats.get("k1"), Some(&AnswerStat::new(1, 1)));
    assert_eq!(stats.get("k2"), Some(&AnswerStat::new(1, 0)));
    assert_eq!(stats.get("k3"), None);
    assert!(store.load("other").is_empty());
}

#[test]
fn stored_accuracy_steers_sampling() {
    let dir = tempdir().unwrap();
    let sheet_path = dir.path().join("kanji.tsv");
    std::fs::write(&sheet_path, SHEET).unwrap();
    let category = Category::new("kanji", "Kanji", "0", true);
    let pool = fetch_questions(&FileSource::new(&sheet_path), &category).unwrap();

    let mut store = SqliteStatsStore::open(dir.path().join("stats.db")).unwrap();
    for _ in 0..10 {
        store.record("kanji", "k1", true).unwrap();
        store.record("kanji", "k2", false).unwrap();
        store.record("kanji", "k3", true).unwrap();
    }
    let stats = store.load("kanji");

    let mut rng = StdRng::seed_from_u64(7);
    let mut first_picks: HashMap<String, u32> = HashMap::new();
    for _ in 0..2000 {
        let picked = pick_weighted_unique(&pool, &stats, 1, &WeightParams::default(), &mut rng);
        *first_picks.entry(picked[0].id.clone()).or_default() += 1;
    }

    let weak = first_picks.get("k2").copied().unwrap_or(0);
    let strong = first_picks.get("k1").copied().unwrap_or(0);
    assert!(weak > strong * 5, "weak={weak} strong={strong}");
}
