//! Companion Games - HTTP games backend for the companion app.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use diesel::{Connection, SqliteConnection};
use diesel_migrations::MigrationHarness;
use tracing::info;
use tracing_subscriber::EnvFilter;

use companion_games::{Cli, Command, GameRepository, GameService, MIGRATIONS, router};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            host,
            port,
            db_path,
        } => serve(host, port, db_path).await,
    }
}

/// Run the HTTP games API server
async fn serve(host: String, port: u16, db_path: String) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Companion Games API server");

    run_migrations(&db_path)?;

    let repository = GameRepository::new(db_path)?;
    let service = GameService::new(repository);
    let app = router(service);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!(host = %host, port, "Games API ready at http://{}:{}/games", host, port);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Applies pending schema migrations before the server starts serving.
fn run_migrations(db_path: &str) -> Result<()> {
    let mut conn = SqliteConnection::establish(db_path)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Migrations failed: {e}"))?;
    info!(count = applied.len(), "Migrations applied");
    Ok(())
}
