//! RegiPRO TUI - terminal portal for Indian compliance registrations
//!
//! A Ratatui-based wizard for GST, MSME (Udyam) and Startup India
//! registrations, with document checks, a security question and a simulated
//! checkout.

mod app;
mod config;
mod platform;
mod services;
mod state;
mod ui;

use anyhow::Result;
use app::App;
use config::PortalConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "regipro_tui=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = PortalConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable config: {e:#}");
        PortalConfig::default()
    });
    let (identity, minted) = config.identity();
    if minted {
        match config.save() {
            Ok(()) => tracing::info!("Created customer id {}", identity.user_id),
            Err(e) => tracing::warn!("Could not save customer id: {e:#}"),
        }
    }

    let mut app = App::new(&config, identity);
    if let Err(err) = app.sign_in().await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
    app.reload_records().await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw the UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll faster while a submission is running so its result shows promptly
        let submitting = app
            .state
            .session
            .as_ref()
            .is_some_and(|s| s.is_submitting());
        let poll_duration = if submitting {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(100)
        };

        // Handle crossterm events
        if event::poll(poll_duration)? {
            if let Event::Key(key) = event::read()? {
                // Global quit: Ctrl+C
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(());
                }

                app.handle_key(key).await?;
            }
        }

        app.poll_submission().await;

        // Check if app wants to quit
        if app.should_quit() {
            return Ok(());
        }
    }
}
