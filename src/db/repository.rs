//! Database repository for game sessions and records.

use chrono::Utc;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use crate::db::{DbError, GameRecord, GameSession, NewGameRecord, NewGameSession, schema};

/// Database repository for session and record operations.
///
/// Opens one connection per call; the database serializes concurrent
/// writers at the row level and the repository adds no locking on top.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository connected to the database at the given path.
    ///
    /// Use `":memory:"` for an in-memory database (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is invalid.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection.
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Inserts a new session row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, session), fields(game_id = %session.game_id(), owner_id = %session.owner_id()))]
    pub fn create_session(&self, session: NewGameSession) -> Result<GameSession, DbError> {
        debug!("Creating session");
        let mut conn = self.connection()?;

        let session = diesel::insert_into(schema::game_sessions::table)
            .values(&session)
            .returning(GameSession::as_returning())
            .get_result(&mut conn)?;

        info!(
            session_id = session.id(),
            game_id = %session.game_id(),
            owner_id = %session.owner_id(),
            "Session created"
        );
        Ok(session)
    }

    /// Gets a session by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_session(&self, session_id: i32) -> Result<Option<GameSession>, DbError> {
        debug!(session_id, "Looking up session");
        let mut conn = self.connection()?;

        let session = schema::game_sessions::table
            .find(session_id)
            .first::<GameSession>(&mut conn)
            .optional()?;

        Ok(session)
    }

    /// Finds the active session for an owner and game, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find_active_session(
        &self,
        owner_id: &str,
        game_id: &str,
    ) -> Result<Option<GameSession>, DbError> {
        debug!(owner_id = %owner_id, game_id = %game_id, "Looking up active session");
        let mut conn = self.connection()?;

        let session = schema::game_sessions::table
            .filter(schema::game_sessions::owner_id.eq(owner_id))
            .filter(schema::game_sessions::game_id.eq(game_id))
            .filter(schema::game_sessions::is_active.eq(true))
            .first::<GameSession>(&mut conn)
            .optional()?;

        if let Some(ref s) = session {
            debug!(session_id = s.id(), "Active session found");
        }

        Ok(session)
    }

    /// Lists all active sessions for an owner, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_active_sessions(&self, owner_id: &str) -> Result<Vec<GameSession>, DbError> {
        debug!(owner_id = %owner_id, "Listing active sessions");
        let mut conn = self.connection()?;

        let sessions = schema::game_sessions::table
            .filter(schema::game_sessions::owner_id.eq(owner_id))
            .filter(schema::game_sessions::is_active.eq(true))
            .order(schema::game_sessions::created_at.asc())
            .load::<GameSession>(&mut conn)?;

        info!(owner_id = %owner_id, count = sessions.len(), "Active sessions loaded");
        Ok(sessions)
    }

    /// Replaces a session's state blob and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the session does not exist or a database
    /// error occurs.
    #[instrument(skip(self, state))]
    pub fn update_session_state(
        &self,
        session_id: i32,
        state: String,
    ) -> Result<GameSession, DbError> {
        debug!(session_id, "Updating session state");
        let mut conn = self.connection()?;

        let session = diesel::update(schema::game_sessions::table.find(session_id))
            .set((
                schema::game_sessions::state.eq(state),
                schema::game_sessions::updated_at.eq(Utc::now().naive_utc()),
            ))
            .returning(GameSession::as_returning())
            .get_result(&mut conn)?;

        info!(session_id, "Session state updated");
        Ok(session)
    }

    /// Marks a session inactive.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the session does not exist or a database
    /// error occurs.
    #[instrument(skip(self))]
    pub fn deactivate_session(&self, session_id: i32) -> Result<GameSession, DbError> {
        debug!(session_id, "Deactivating session");
        let mut conn = self.connection()?;

        let session = diesel::update(schema::game_sessions::table.find(session_id))
            .set((
                schema::game_sessions::is_active.eq(false),
                schema::game_sessions::updated_at.eq(Utc::now().naive_utc()),
            ))
            .returning(GameSession::as_returning())
            .get_result(&mut conn)?;

        info!(session_id, "Session deactivated");
        Ok(session)
    }

    /// Appends an immutable record for a finished session.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, record), fields(session_id = record.session_id(), winner = %record.winner()))]
    pub fn append_record(&self, record: NewGameRecord) -> Result<GameRecord, DbError> {
        debug!("Appending game record");
        let mut conn = self.connection()?;

        let record = diesel::insert_into(schema::game_records::table)
            .values(&record)
            .returning(GameRecord::as_returning())
            .get_result(&mut conn)?;

        info!(
            record_id = record.id(),
            session_id = record.session_id(),
            winner = %record.winner(),
            "Game record appended"
        );
        Ok(record)
    }

    /// Lists records for an owner, newest first, optionally filtered by
    /// game id and capped at `limit` rows.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_records(
        &self,
        owner_id: &str,
        game_id: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<GameRecord>, DbError> {
        debug!(owner_id = %owner_id, ?game_id, ?limit, "Listing records");
        let mut conn = self.connection()?;

        let mut query = schema::game_records::table
            .filter(schema::game_records::owner_id.eq(owner_id))
            .into_boxed();

        if let Some(game_id) = game_id {
            query = query.filter(schema::game_records::game_id.eq(game_id));
        }

        query = query.order((
            schema::game_records::played_at.desc(),
            schema::game_records::id.desc(),
        ));

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let records = query.load::<GameRecord>(&mut conn)?;

        info!(owner_id = %owner_id, count = records.len(), "Records loaded");
        Ok(records)
    }
}
