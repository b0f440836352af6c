mod app;
mod clock;
mod domain;
mod history;
mod input;
mod notifications;
mod persistence;
mod planner;
mod report;
mod ticker;
mod timer;
mod ui;

use anyhow::{Context, Result};
use app::AppState;
use clap::{Parser, Subcommand};
use clock::SystemClock;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use notifications::DesktopNotifier;
use persistence::{
    ensure_data_dir, ensure_dir, get_data_dir, init_local_data_dir, load_settings, logs_dir,
    save_settings, settings_file, FileStore, Settings,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use report::{render_status, ReportInputs};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "STRIDE_LOG";

#[derive(Parser)]
#[command(name = "stride")]
#[command(about = "A terminal project tracker with focus and Pomodoro timers", long_about = None)]
struct Cli {
    /// Data directory. Defaults to the nearest .stride directory, then ~/.stride
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .stride directory in the current directory
    Init,
    /// Print timer and streak state
    Status,
    /// Generate a markdown report with statistics
    Report {
        /// Date to generate report for (YYYY-MM-DD format). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
        /// Output file path. Defaults to <data dir>/report-YYYY-MM-DD.md
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export week-by-week and month-by-month totals
    Trends {
        /// Number of Sunday-to-Saturday weeks, ending with the current one
        #[arg(long, default_value_t = 4)]
        weeks: u32,
        /// Number of calendar months, ending with the current one
        #[arg(long, default_value_t = 6)]
        months: u32,
        /// Output file path. Defaults to <data dir>/trends-YYYY-MM-DD.md
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// CLI subcommands log to stderr
fn init_cli_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .init();
}

/// The TUI owns the terminal, so logs go to <data dir>/logs/stride.log
fn init_file_logging(data_dir: &Path) -> Result<WorkerGuard> {
    let log_dir = logs_dir(data_dir);
    ensure_dir(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "stride.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            init_cli_logging();
            let cwd = std::env::current_dir().context("Could not determine current directory")?;
            let data_dir = init_local_data_dir(&cwd)?;
            save_settings(settings_file(&data_dir), &Settings::default())
                .context("Failed to write default settings")?;

            println!("Initialized stride directory: {}", data_dir.display());
            println!();
            println!("Stride will now use this local directory for its data.");
            println!("Edit settings.json there to change Pomodoro lengths.");
            Ok(())
        }
        Some(Commands::Status) => {
            init_cli_logging();
            let data_dir = get_data_dir(cli.data_dir.as_deref())?;
            let store = FileStore::new(data_dir);
            let inputs = ReportInputs::load(&store);
            println!("{}", render_status(&inputs, chrono::Local::now()));
            Ok(())
        }
        Some(Commands::Report { date, output }) => {
            init_cli_logging();
            let report_date = match date {
                Some(date_str) => chrono::NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                    .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD", date_str))?,
                None => chrono::Local::now().date_naive(),
            };

            let data_dir = ensure_data_dir(cli.data_dir.as_deref())?;
            let store = FileStore::new(data_dir.clone());

            println!("Generating report for {}...", report_date);
            let report_path = report::generate_report(&store, &data_dir, report_date, output)?;
            println!("Report generated: {}", report_path.display());
            Ok(())
        }
        Some(Commands::Trends {
            weeks,
            months,
            output,
        }) => {
            init_cli_logging();
            let data_dir = ensure_data_dir(cli.data_dir.as_deref())?;
            let store = FileStore::new(data_dir.clone());
            let today = chrono::Local::now().date_naive();

            let trends_path =
                report::generate_trends(&store, &data_dir, today, weeks, months, output)?;
            info!(weeks, months, "trends exported");
            println!("Trends exported: {}", trends_path.display());
            Ok(())
        }
        None => run_tui(cli.data_dir.as_deref()),
    }
}

fn run_tui(data_dir_override: Option<&Path>) -> Result<()> {
    let data_dir = ensure_data_dir(data_dir_override)?;
    let _log_guard = init_file_logging(&data_dir)?;

    let settings = load_settings(settings_file(&data_dir));
    info!(data_dir = %data_dir.display(), "starting stride");

    let store = FileStore::new(data_dir.clone());
    let notifier = DesktopNotifier::new(settings.notifications);
    let mut app = AppState::new(
        Box::new(store.clone()),
        Box::new(notifier),
        Box::new(SystemClock),
        settings,
    );
    app.open_planner_if_needed();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &store, &data_dir);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Save on exit
    if let Err(e) = app.save_all() {
        eprintln!("Error saving state: {:#}", e);
    }
    info!("stride stopped");

    if let Err(err) = result {
        eprintln!("Error: {:#}", err);
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    store: &FileStore,
    data_dir: &Path,
) -> Result<()> {
    let tick_rate = ticker::tick_duration();

    loop {
        if app.needs_render {
            terminal.draw(|f| ui::render(f, app))?;
            app.needs_render = false;
        }

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            match event::read()? {
                // Only process key press events (ignore key release)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if input::handle_key(app, key)? {
                        return Ok(());
                    }
                    app.needs_render = true;
                }
                Event::Resize(_, _) => app.needs_render = true,
                _ => {}
            }
        }

        if app.tick() {
            // Write the report for the day that just ended
            if let Err(err) = app.save() {
                warn!(error = %err, "save before day report failed");
            }
            if let Some(previous) = app.today().pred_opt() {
                match report::generate_report(store, data_dir, previous, None) {
                    Ok(path) => info!(path = %path.display(), "wrote report for previous day"),
                    Err(err) => warn!(error = %err, date = %previous, "failed to write day report"),
                }
            }
        }

        // Autosave if needed
        if app.needs_save {
            if let Err(err) = app.save() {
                // Retried on the next edit
                warn!(error = %err, "autosave failed");
                app.needs_save = false;
            }
        }
    }
}
