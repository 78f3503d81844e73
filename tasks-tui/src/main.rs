mod api;
mod app;
mod calendar;
mod cli;
mod config;
mod logging;
mod login;
mod runtime;
mod session_store;
mod theme;
mod time_utils;
mod ui;

use anyhow::{Context, Result};
use api::{DevBackend, TaskBackend};
use app::App;
use clap::Parser;
use cli::{Cli, Commands};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use session_store::{FileStore, MemoryStore, SessionStore, SharedStore};
use std::io;
use std::sync::Arc;
use tasks_api::TasksClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env.tui
    dotenvy::from_filename(".env.tui").ok();

    let cli = Cli::parse();
    let cfg = config::TasksConfig::load()?;
    let log_path = logging::init(&cfg)?;
    tracing::info!(api_url = %cfg.api_url, log = %log_path.display(), "starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let store: SharedStore = Arc::new(FileStore::open_default()?);
            let client = TasksClient::new(&cfg.api_url)?;
            run_tui(store, &client).await?;
        }
        Commands::Dev => {
            println!("Dev mode: in-memory tasks, log in with any username and password.");
            let store: SharedStore = Arc::new(MemoryStore::new());
            run_tui(store, &DevBackend::new()).await?;
        }
        Commands::Login => {
            let store: SharedStore = Arc::new(FileStore::open_default()?);
            let client = TasksClient::new(&cfg.api_url)?;
            login::run_login(&client, &SessionStore::new(store)).await?;
        }
        Commands::Register => {
            let client = TasksClient::new(&cfg.api_url)?;
            login::run_register(&client).await?;
        }
        Commands::Logout => {
            let store: SharedStore = Arc::new(FileStore::open_default()?);
            SessionStore::new(store).clear()?;
            tracing::info!("logged out from the command line");
            println!("Logged out. Stored session removed.");
        }
        Commands::ConfigPath => {
            let path = config::TasksConfig::config_path()?;
            if !path.exists() {
                config::TasksConfig::default().save()?;
                println!("Created default config at: {}", path.display());
            } else {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

async fn run_tui(store: SharedStore, api: &dyn TaskBackend) -> Result<()> {
    let mut app = App::new(store, theme::system_prefers_dark());

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = runtime::run_app(&mut terminal, &mut app, api).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!(error = ?err, "terminal UI stopped with an error");
    }
    res
}
