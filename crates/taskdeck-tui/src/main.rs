//! taskdeck - a terminal client for team project management.
//!
//! Provides a fast, keyboard-driven interface for projects, tasks, project
//! membership and subscription management against the taskdeck REST API.

mod app;
mod ui;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use taskdeck_core::auth::{CredentialStore, Session, SessionHandle, TokenStore};
use taskdeck_core::{ApiClient, Config};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name in the application data directory
const LOG_FILE: &str = "taskdeck.log";

/// Initialize tracing into a log file; stderr belongs to the TUI.
/// The returned guard must stay alive for the writer thread to flush.
fn init_tracing() -> Result<WorkerGuard> {
    let dir = Config::data_dir()?;
    std::fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--login" {
        return login_interactive().await;
    }
    if args.len() > 1 && args[1] == "--logout" {
        return logout_cli();
    }

    let _guard = init_tracing()?;
    info!("taskdeck starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::new()?;

    // A persisted credential pair seeds the session across restarts
    if app.is_authenticated() {
        app.refresh_dashboard_background();
    } else {
        app.start_login();
    }

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("taskdeck shutting down");
    Ok(())
}

/// Interactive terminal login for headless session provisioning
async fn login_interactive() -> Result<()> {
    let mut config = Config::load().unwrap_or_default();
    let session = SessionHandle::new(Session::new(TokenStore::new(Config::data_dir()?)));
    let api = ApiClient::new(config.api_base_url(), session.clone())?;

    println!("\n=== taskdeck login ===\n");

    let email = match config.last_email {
        Some(ref last) => {
            print!("Email [{}]: ", last);
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            let input = input.trim();

            if input.is_empty() {
                last.clone()
            } else {
                input.to_string()
            }
        }
        None => prompt_email()?,
    };

    let password = if CredentialStore::has_credentials(&email) {
        print!("Use stored password? [Y/n]: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if input.trim().to_lowercase() != "n" {
            CredentialStore::get_password(&email)?
        } else {
            rpassword::prompt_password("Password: ")?
        }
    } else {
        rpassword::prompt_password("Password: ")?
    };

    println!("\nAuthenticating...");

    let response = api.login(&email, &password).await?;
    let username = response.username.unwrap_or_else(|| email.clone());
    session.login(&response.access_token, &username)?;

    CredentialStore::store(&email, &password)?;

    config.last_email = Some(email);
    config.save()?;

    println!("Login successful!\n");
    Ok(())
}

fn prompt_email() -> Result<String> {
    print!("Email: ");
    io::stdout().flush()?;

    let mut email = String::new();
    io::stdin().read_line(&mut email)?;
    Ok(email.trim().to_string())
}

/// Clear the persisted session
fn logout_cli() -> Result<()> {
    let session = SessionHandle::new(Session::new(TokenStore::new(Config::data_dir()?)));
    session.logout()?;
    println!("Signed out.");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(());
                }

                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
