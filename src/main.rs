use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use luminate::{
    app::App,
    app_dirs::AppDirs,
    catalog::{Catalog, DayPlan},
    config::{Config, ConfigStore, FileConfigStore},
    cue::{CuePlayer, Silent, TerminalBell},
    program::{today_weekday, ProgramProgress},
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    session::TREADMILL_SECS,
    store::SqliteStore,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    error::Error,
    fmt::Write as _,
    fs,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const TICK_RATE_MS: u64 = 100;

/// guided workout sessions and daily progress tracking in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal workout companion: an 18-week staged program with daily exercise checklists, round tracking and a guided session timer with rest periods."
)]
pub struct Cli {
    /// exercise catalog JSON to use instead of the built-in one
    #[clap(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// progress database location
    #[clap(long, value_name = "PATH")]
    store: Option<PathBuf>,

    /// do not ring the terminal bell for start and rest cues
    #[clap(long)]
    silent: bool,

    /// log at debug level
    #[clap(short, long)]
    verbose: bool,

    /// print today's plan and progress, then exit
    #[clap(long)]
    summary: bool,
}

fn setup_logging(verbose: bool) -> Result<PathBuf, Box<dyn Error>> {
    let log_dir = AppDirs::log_dir();
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("luminate.log");
    let log_file = fs::File::create(&log_path)?;

    // the terminal belongs to the TUI, so logs only go to the file
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!(verbose, "logging initialized");
    Ok(log_path)
}

/// Stored config with command line overrides applied. A default config file
/// is written on first run so there is something to edit.
fn load_config(cli: &Cli, store: &impl ConfigStore) -> Config {
    let stored = store.load();
    if !store.exists() {
        if let Err(err) = store.save(&stored) {
            warn!(%err, "could not write default config");
        }
    }
    stored.merge_cli(cli.catalog.clone(), cli.store.clone(), cli.silent)
}

fn summary(catalog: &Catalog, progress: &ProgramProgress) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Day {}, week {}, stage {}",
        progress.day + 1,
        progress.week + 1,
        progress.stage().number()
    );

    let status = match progress.today(catalog) {
        _ if progress.workout_done => "workout complete",
        DayPlan::Rest => "rest day",
        DayPlan::Workout(_) => "ready",
    };
    let _ = writeln!(out, "Today: {status}");

    if let DayPlan::Workout(main) = progress.today(catalog) {
        let _ = writeln!(out, "Treadmill: {} minutes", TREADMILL_SECS / 60);
        for (title, exercises) in [("Warm-up", catalog.warm_up()), ("Main workout", main.as_slice())] {
            let _ = writeln!(out, "{title}:");
            for exercise in exercises {
                let _ = write!(out, "  {} x{}", exercise.name, exercise.rounds);
                if let Some(counts) = &exercise.counts {
                    let _ = write!(out, " ({counts} counts)");
                }
                out.push('\n');
            }
        }
        let _ = writeln!(out, "Cardio: {} minutes", progress.cardio_minutes());
    }

    let total = if progress.completion.is_empty() {
        progress.total_slots(catalog)
    } else {
        progress.completion.len()
    };
    let _ = writeln!(
        out,
        "Progress: {}/{} ({:.0}%)",
        progress.completed_count(),
        total,
        progress.completion_percentage()
    );
    out
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Err(err) = setup_logging(cli.verbose) {
        eprintln!("luminate: logging disabled: {err}");
    }

    let config = load_config(&cli, &FileConfigStore::new());

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_file(path)?,
        None => Catalog::builtin()?,
    };
    let mut store = match &config.store_path {
        Some(path) => SqliteStore::open(path)?,
        None => SqliteStore::open_default()?,
    };

    if cli.summary {
        let progress = ProgramProgress::load(&mut store, today_weekday())?;
        print!("{}", summary(&catalog, &progress));
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let cues: Box<dyn CuePlayer> = if config.bell {
        Box::new(TerminalBell::stdout())
    } else {
        Box::new(Silent)
    };
    let mut app = App::new(catalog, store, today_weekday(), cues)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let result = app.run(&mut terminal, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("exited");
    result.map_err(Into::into)
}
