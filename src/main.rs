use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use sheetquiz::{
    app::{Action, App},
    category::Category,
    config::{Config, ConfigStore, FileConfigStore},
    runtime::{CrosstermEventSource, FixedTicker, QuizEventSource, Runner, Ticker},
    source::{BundledSource, FileSource, HttpSource, QuestionSource},
    stats::{MemoryStatsStore, SqliteStatsStore, StatsStore},
};

const TICK_RATE_MS: u64 = 100;

/// terminal quiz over multiple-choice questions published as spreadsheets
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal quiz that draws multiple-choice questions from published spreadsheets, favouring the ones you get wrong."
)]
pub struct Cli {
    /// category key to start immediately
    #[clap(short = 'c', long)]
    category: Option<String>,

    /// questions per session (overrides the config file)
    #[clap(short = 'n', long)]
    max_questions: Option<usize>,

    /// read questions from a local TSV file instead of the network
    #[clap(short = 'f', long, conflicts_with = "sample")]
    file: Option<PathBuf>,

    /// use the bundled sample sheet
    #[clap(long)]
    sample: bool,

    /// draw questions uniformly instead of weighting by past accuracy
    #[clap(short = 'r', long)]
    random: bool,

    /// forget recorded answers for --category and exit
    #[clap(long, requires = "category")]
    reset_stats: bool,

    /// path to the config file
    #[clap(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Config file contents with command line overrides applied
    fn resolve_config(&self) -> Config {
        let store = match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        };
        let mut config = store.load();
        log::debug!("config from {}", store.path().display());

        if let Some(n) = self.max_questions {
            config.max_questions = n;
        }
        if self.random {
            config.random_selection = true;
        }
        if self.sample {
            config.categories = vec![Category::sample()];
        }
        config
    }

    fn question_source(&self, config: &Config) -> Result<Arc<dyn QuestionSource>, Box<dyn Error>> {
        if self.sample {
            return Ok(Arc::new(BundledSource));
        }
        if let Some(path) = &self.file {
            return Ok(Arc::new(FileSource::new(path)));
        }
        let timeout = Duration::from_secs(config.fetch_timeout_secs);
        Ok(Arc::new(HttpSource::new(&config.published_base, timeout)?))
    }
}

fn open_stats() -> Box<dyn StatsStore> {
    match SqliteStatsStore::new() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("stats database unavailable, answers will not be kept: {e}");
            Box::new(MemoryStatsStore::new())
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    if cli.reset_stats {
        if let Some(key) = &cli.category {
            SqliteStatsStore::new()?.clear(key)?;
            println!("cleared stats for {key}");
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config = cli.resolve_config();
    let source = cli.question_source(&config)?;
    let mut app = App::new(&config, open_stats(), source);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let result = start_tui(&mut terminal, &mut app, &runner, cli.category.as_deref());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: QuizEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
    auto_start: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let tx = runner.sender();
    if let Some(key) = auto_start {
        app.auto_start(key, &tx);
    }

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        if app.on_event(runner.step(), &tx) == Action::Quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use ratatui::backend::TestBackend;
    use sheetquiz::runtime::{QuizEvent, TestEventSource};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::tempdir;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["sheetquiz"]);

        assert_eq!(cli.category, None);
        assert_eq!(cli.max_questions, None);
        assert_eq!(cli.file, None);
        assert!(!cli.sample);
        assert!(!cli.random);
        assert!(!cli.reset_stats);
    }

    #[test]
    fn test_cli_category_and_count() {
        let cli = Cli::parse_from(["sheetquiz", "-c", "eiken3", "-n", "10"]);
        assert_eq!(cli.category.as_deref(), Some("eiken3"));
        assert_eq!(cli.max_questions, Some(10));

        let cli = Cli::parse_from(["sheetquiz", "--category", "rails", "--max-questions", "5"]);
        assert_eq!(cli.category.as_deref(), Some("rails"));
        assert_eq!(cli.max_questions, Some(5));
    }

    #[test]
    fn test_cli_file_conflicts_with_sample() {
        let result = Cli::try_parse_from(["sheetquiz", "--file", "q.tsv", "--sample"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_reset_stats_needs_category() {
        assert!(Cli::try_parse_from(["sheetquiz", "--reset-stats"]).is_err());
        let cli = Cli::parse_from(["sheetquiz", "--reset-stats", "-c", "eiken4"]);
        assert!(cli.reset_stats);
    }

    #[test]
    fn test_resolve_config_applies_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let cli = Cli::parse_from([
            "sheetquiz",
            "--config",
            path.to_str().unwrap(),
            "-n",
            "7",
            "--random",
            "--sample",
        ]);

        let config = cli.resolve_config();
        assert_eq!(config.max_questions, 7);
        assert!(config.random_selection);
        assert_eq!(config.categories, vec![Category::sample()]);
    }

    #[test]
    fn test_resolve_config_uses_file_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let stored = Config {
            max_questions: 12,
            ..Config::default()
        };
        FileConfigStore::with_path(&path).save(&stored).unwrap();

        let cli = Cli::parse_from(["sheetquiz", "--config", path.to_str().unwrap()]);
        assert_eq!(cli.resolve_config().max_questions, 12);
    }

    #[test]
    fn test_start_tui_quits_on_q() {
        let dir = tempdir().unwrap();
        let cli = Cli::parse_from([
            "sheetquiz",
            "--sample",
            "--config",
            dir.path().join("c.json").to_str().unwrap(),
        ]);
        let config = cli.resolve_config();
        let source = cli.question_source(&config).unwrap();
        let mut app = App::new(&config, Box::new(MemoryStatsStore::new()), source);

        let runner = Runner::new(
            TestEventSource::new(),
            FixedTicker::new(Duration::from_millis(5)),
        );
        runner
            .sender()
            .send(QuizEvent::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)))
            .unwrap();

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        start_tui(&mut terminal, &mut app, &runner, None).unwrap();
    }
}
