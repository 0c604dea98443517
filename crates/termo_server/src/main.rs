//! Termo server entry point.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use diesel::{Connection, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;
use tracing_subscriber::EnvFilter;

use termo_server::{AppState, Cli, GameRepository, GameService, UserService, load_words, router};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let words = load_words(&cli.wordlist)?;
    if words.is_empty() {
        bail!("word list '{}' is empty", cli.wordlist.display());
    }

    run_migrations(&cli.db_path)?;

    let repository = GameRepository::new(cli.db_path.clone())?;
    let games = GameService::new(words, repository.clone());
    let users = UserService::new(repository);
    let state = AppState {
        games: Arc::new(games),
        users: Arc::new(users),
    };

    let listener = tokio::net::TcpListener::bind((cli.host.as_str(), cli.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", cli.host, cli.port))?;
    info!(host = %cli.host, port = cli.port, "Server listening");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

/// Applies pending migrations before the first request can arrive.
fn run_migrations(db_path: &str) -> Result<()> {
    let mut conn = SqliteConnection::establish(db_path)
        .with_context(|| format!("failed to open database '{db_path}'"))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("migrations failed: {e}"))?;
    info!(applied = applied.len(), "Database migrations up to date");
    Ok(())
}
