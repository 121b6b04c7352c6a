//! MACES - a terminal client for park attendance sign-in.
//!
//! Players sign in for a class at an event link their park officer shared.
//! Officers also generate those links and forward the day's sign-ins
//! upstream with the credits each player earns.

mod app;
mod toast;
mod ui;

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use maces_core::api::ApiClient;
use maces_core::config::Config;
use maces_core::event_link::EventParams;

use app::{App, AppState};
use ui::input::{handle_input, handle_paste};
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const LOG_FILE: &str = "maces.log";

const USAGE: &str = "\
Usage: maces [EVENT_URL]
       maces --check-officer

  EVENT_URL        link of the form https://host/?parkId=<id>&date=<YYYY-MM-DD>
  --check-officer  log in on the command line and print officer status
  -h, --help       show this message

Environment:
  MACES_BASE_URL   backend to talk to
  MACES_USERNAME   pre-fill the login form
  MACES_PASSWORD   pre-fill the login form
  RUST_LOG         log filter (logs go to the cache directory)";

/// Initialize the tracing subscriber for logging.
///
/// The terminal belongs to the UI, so logs go to a file in the cache
/// directory. The returned guard flushes it on drop.
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = Config::log_dir().ok()?;
    std::fs::create_dir_all(&log_dir).ok()?;
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, LOG_FILE));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = init_tracing();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    let event_params = match args.get(1).map(String::as_str) {
        Some("-h") | Some("--help") => {
            println!("{}", USAGE);
            return Ok(());
        }
        Some("--check-officer") => return check_officer().await,
        Some(url) => {
            let params = EventParams::from_url(url);
            if !params.is_populated() {
                warn!(%url, "Event link is missing parkId or date");
            }
            params
        }
        None => EventParams::default(),
    };

    info!("MACES starting");

    // Create app before taking over the terminal so errors print normally
    let mut app = App::new(event_params)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("MACES shutting down");
    Ok(())
}

/// Log in without the UI and print officer status and the class list
async fn check_officer() -> Result<()> {
    let config = Config::load().unwrap_or_default();
    let api = ApiClient::new(&config.base_url())?;

    let username = match std::env::var(app::USERNAME_ENV) {
        Ok(name) if !name.trim().is_empty() => name,
        _ => {
            print!("Username: ");
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line
        }
    };
    let username = username.trim();
    let password = match std::env::var(app::PASSWORD_ENV) {
        Ok(password) if !password.is_empty() => password,
        _ => rpassword::prompt_password("Password: ").context("Failed to read password")?,
    };

    let status = api
        .authenticate(username, &password)
        .await
        .context("Login failed")?;

    if status.is_officer {
        println!("{} is an officer of park {}", username, status.park_id);
    } else {
        println!("{} is a player at park {} (not an officer)", username, status.park_id);
    }

    let classes = api.fetch_classes().await.context("Failed to fetch classes")?;
    println!("\n{} classes:", classes.len());
    for class in &classes {
        println!("  {:>4}  {}", class.class_id, class.class_name);
    }
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout so toasts expire on time
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    // Ctrl+C to quit
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }

                    // Handle input
                    if handle_input(app, key).await? {
                        return Ok(());
                    }
                }
                Event::Paste(text) => handle_paste(app, &text),
                _ => {}
            }
        }

        app.tick();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
