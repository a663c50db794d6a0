use std::env;
use std::io::{self, Stdout};
use std::path::PathBuf;

use anyhow::{Context, Result};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use tlite::app::App;
use tlite::config;
use tlite::session::{load_session, save_session};

fn print_version() {
    println!("tlite {}", env!("CARGO_PKG_VERSION"));
}

fn print_usage() {
    eprintln!("tlite - A keyboard-first SQLite database manager");
    eprintln!();
    eprintln!("Usage: tlite [OPTIONS] [DB_FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [DB_FILE]         SQLite database file to open");
    eprintln!("                    (created empty if it does not exist)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -h, --help        Print this help message");
    eprintln!("  -V, --version     Print version information");
    eprintln!();
    eprintln!("Configuration:");
    if let Some(path) = config::config_path() {
        eprintln!("  Config file: {}", path.display());
    }
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  tlite inventory.db");
    eprintln!("  tlite");
}

fn main() -> Result<()> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }

    if args.iter().any(|a| a == "-V" || a == "--version") {
        print_version();
        return Ok(());
    }

    // Load configuration from ~/.config/tlite/config.toml
    let cfg = config::load_config().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {}", e);
        config::Config::default()
    });

    // Load session state if persistence is enabled
    let session = if cfg.session.persist {
        load_session().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load session: {}", e);
            Default::default()
        })
    } else {
        Default::default()
    };

    // Database file priority: CLI arg > saved session
    let cli_path = args
        .get(1)
        .filter(|a| !a.starts_with('-'))
        .map(PathBuf::from);

    let rt = Runtime::new().context("failed to initialize tokio runtime")?;
    let (db_events_tx, db_events_rx) = mpsc::unbounded_channel();

    let mut terminal =
        init_terminal().context("failed to initialize terminal; are you running in a real TTY?")?;

    let mut app = App::with_config(
        rt.handle().clone(),
        db_events_tx,
        db_events_rx,
        cli_path,
        cfg,
    );

    // Apply session state (log visibility, last database/table); reopen the
    // last database unless a CLI path already claimed the connection.
    if let Some(path) = app.apply_session_state(session) {
        app.start_open(path);
    }

    let res = app.run(&mut terminal);

    restore_terminal(terminal)?;

    if app.config.session.persist {
        if let Err(e) = save_session(&app.session_state()) {
            eprintln!("Warning: Failed to save session: {}", e);
        }
    }

    res
}

fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
