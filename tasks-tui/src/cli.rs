use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tasks-tui")]
#[command(about = "Terminal client for a personal task list")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run against the configured tasks server (default)
    Run,
    /// Run with an in-memory backend and seeded tasks; nothing is saved
    Dev,
    /// Log in from the command line and store the session
    Login,
    /// Create an account from the command line
    Register,
    /// Remove the stored session
    Logout,
    /// Print config path and create default file if missing
    ConfigPath,
}
