//! Companion Games - game session backend for the companion app.
//!
//! Stores game sessions and historical records in SQLite and exposes the
//! games REST surface the companion frontend talks to.
//!
//! # Architecture
//!
//! - **Games**: static catalog plus a pure move engine over a tagged
//!   union of per-game state payloads (word chain, trivia, guess number)
//! - **Db**: Diesel repository, one row per session and per record
//! - **Service**: session lifecycle (idempotent start, play, end) and
//!   statistics aggregation
//! - **Server**: axum REST routes with the frontend's JSON shapes
//!
//! # Example
//!
//! ```no_run
//! use companion_games::{GameRepository, GameService, router};
//!
//! # fn example() -> anyhow::Result<()> {
//! let repository = GameRepository::new("companion_games.db".to_string())?;
//! let app = router(GameService::new(repository));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod db;
mod error;
mod games;
mod server;
mod service;
mod stats;

// Crate-level exports - CLI
pub use cli::{Cli, Command};

// Crate-level exports - Persistence
pub use db::{
    DbError, GameRecord, GameRepository, GameSession, MIGRATIONS, NewGameRecord, NewGameSession,
    Winner,
};

// Crate-level exports - Error taxonomy
pub use error::GameError;

// Crate-level exports - Game catalog and engine
pub use games::{
    GameDefinition, GameKind, GameState, GuessNumberState, Hint, MoveOutcome, PlayerAction,
    TriviaAnswerRecord, TriviaQuestion, TriviaState, Turn, WordChainState, apply_move, get_game,
    initial_state, list_games,
};

// Crate-level exports - HTTP surface
pub use server::{
    ApiError, CreateSessionRequest, GuessNumberPlayRequest, RecordsQuery, StatsQuery,
    TriviaAnswerRequest, WordChainPlayRequest, router,
};

// Crate-level exports - Session lifecycle and statistics
pub use service::{GameService, PlayResult};
pub use stats::{GameStatistics, GameTypeStats, aggregate};
