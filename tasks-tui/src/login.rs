use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use tasks_api::Credentials;

use crate::api::TaskBackend;
use crate::session_store::SessionStore;

fn prompt_credentials() -> Result<Credentials> {
    print!("Username: ");
    io::stdout().flush()?;
    let mut username = String::new();
    io::stdin()
        .lock()
        .read_line(&mut username)
        .context("Failed to read username")?;

    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;

    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        anyhow::bail!("Username and password are required");
    }
    Ok(Credentials::new(username, password))
}

/// Prompt for credentials, log in and store the returned token.
pub async fn run_login(api: &dyn TaskBackend, session: &SessionStore) -> Result<()> {
    let credentials = prompt_credentials()?;
    let response = api.login(&credentials).await.context("Login failed")?;
    session.set(&response.access_token)?;
    tracing::info!(username = %credentials.username, "logged in from the command line");
    println!("Logged in as {}. Session saved.", credentials.username);
    Ok(())
}

/// Prompt for credentials and create an account. The user logs in afterwards.
pub async fn run_register(api: &dyn TaskBackend) -> Result<()> {
    let credentials = prompt_credentials()?;
    let response = api
        .register(&credentials)
        .await
        .context("Registration failed")?;
    tracing::info!(username = %credentials.username, "registered from the command line");
    if let Some(msg) = response.msg {
        println!("{}", msg);
    }
    println!("Registration successful! Run `tasks-tui login` to log in.");
    Ok(())
}
