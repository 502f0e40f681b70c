//! Database persistence layer for game sessions and historical records.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

use diesel_migrations::{EmbeddedMigrations, embed_migrations};

pub use error::DbError;
pub use models::{GameRecord, GameSession, NewGameRecord, NewGameSession, Winner};
pub use repository::GameRepository;

/// Embedded schema migrations, applied at server startup and in tests.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");
