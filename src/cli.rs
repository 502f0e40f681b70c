//! Command-line interface for the companion games backend.

use clap::{Parser, Subcommand};

/// Companion Games - game session backend for the companion app
#[derive(Parser, Debug)]
#[command(name = "companion_games")]
#[command(about = "Game session backend for the companion app", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP games API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long, default_value = "companion_games.db")]
        db_path: String,
    },
}
