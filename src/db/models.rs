//! Database models and domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use crate::db::{DbError, schema};

/// Game session database model.
///
/// One row per play-through. `state` holds the game-type-specific JSON
/// blob; rows are never deleted, they are deactivated when the session
/// ends and retained next to the record they produced.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::game_sessions)]
pub struct GameSession {
    id: i32,
    game_id: String,
    owner_id: String,
    state: String,
    is_active: bool,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// Insertable session model for starting new sessions.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::game_sessions)]
pub struct NewGameSession {
    game_id: String,
    owner_id: String,
    state: String,
}

/// Historical record of a finished session. Immutable once written.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::game_records)]
#[diesel(belongs_to(GameSession, foreign_key = session_id))]
pub struct GameRecord {
    id: i32,
    game_id: String,
    owner_id: String,
    session_id: i32,
    user_score: i32,
    companion_score: i32,
    rounds_played: i32,
    winner: String,
    played_at: NaiveDateTime,
}

impl GameRecord {
    /// Parses the stored winner string into a [`Winner`] enum.
    pub fn parse_winner(&self) -> Result<Winner, DbError> {
        Winner::from_db_string(self.winner())
    }
}

/// Insertable record model for finished sessions.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::game_records)]
pub struct NewGameRecord {
    game_id: String,
    owner_id: String,
    session_id: i32,
    user_score: i32,
    companion_score: i32,
    rounds_played: i32,
    winner: String,
}

/// Session outcome from the owner's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winner {
    /// The user outscored the companion.
    User,
    /// The companion outscored the user.
    Companion,
    /// Scores were equal.
    Tie,
}

impl Winner {
    /// Derives the winner from final scores; equal scores tie.
    pub fn from_scores(user_score: i32, companion_score: i32) -> Self {
        if user_score > companion_score {
            Self::User
        } else if companion_score > user_score {
            Self::Companion
        } else {
            Self::Tie
        }
    }

    /// Converts the winner to the string stored in the database.
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Companion => "companion",
            Self::Tie => "tie",
        }
    }

    /// Parses a winner from the string stored in the database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the string is not a valid winner value.
    pub fn from_db_string(s: &str) -> Result<Self, DbError> {
        match s {
            "user" => Ok(Self::User),
            "companion" => Ok(Self::Companion),
            "tie" => Ok(Self::Tie),
            _ => Err(DbError::new(format!("Invalid winner: '{}'", s))),
        }
    }
}
