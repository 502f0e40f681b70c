//! Session lifecycle business logic layer.

use tracing::{debug, info, instrument, warn};

use crate::db::{GameRecord, GameRepository, GameSession, NewGameRecord, NewGameSession, Winner};
use crate::error::GameError;
use crate::games::{self, GameKind, GameState, MoveOutcome, PlayerAction};
use crate::stats::{self, GameStatistics};

/// Result of one play call: the move outcome plus the session state after
/// the move (unchanged when the move was rejected).
#[derive(Debug, Clone)]
pub struct PlayResult {
    /// What the rules decided about the move.
    pub outcome: MoveOutcome,
    /// Session state after the move.
    pub state: GameState,
}

/// Service layer owning the game-session lifecycle end-to-end.
///
/// Wraps [`GameRepository`] with session creation (deduplicated per
/// owner and game), move application, session ending, and statistics.
/// Receives its store handle at construction; there is no ambient state.
#[derive(Debug, Clone)]
pub struct GameService {
    repository: GameRepository,
}

impl GameService {
    /// Creates a new game service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: GameRepository) -> Self {
        info!("Creating GameService");
        Self { repository }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &GameRepository {
        &self.repository
    }

    /// Starts a session, or returns the existing active one unchanged.
    ///
    /// Uniqueness of the active (owner, game) pair is enforced by this
    /// lookup-before-create, not by a database constraint.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] for an unknown game id.
    #[instrument(skip(self))]
    pub fn start_session(&self, game_id: &str, owner_id: &str) -> Result<GameSession, GameError> {
        let kind = GameKind::parse(game_id)
            .ok_or_else(|| GameError::NotFound(format!("game '{game_id}'")))?;

        if let Some(existing) = self.repository.find_active_session(owner_id, kind.as_str())? {
            info!(session_id = existing.id(), "Returning existing active session");
            return Ok(existing);
        }

        debug!(game = %kind, owner_id = %owner_id, "Starting new session");
        let state = games::initial_state(kind);
        let session = self.repository.create_session(NewGameSession::new(
            kind.as_str().to_string(),
            owner_id.to_string(),
            state.to_blob()?,
        ))?;

        info!(session_id = session.id(), game = %kind, "Session started");
        Ok(session)
    }

    /// Fetches a session by id.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if the id does not resolve.
    #[instrument(skip(self))]
    pub fn session(&self, session_id: i32) -> Result<GameSession, GameError> {
        self.repository
            .get_session(session_id)?
            .ok_or_else(|| GameError::NotFound(format!("session {session_id}")))
    }

    /// Lists all active sessions for an owner.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Storage`] on database failure.
    #[instrument(skip(self))]
    pub fn active_sessions(&self, owner_id: &str) -> Result<Vec<GameSession>, GameError> {
        Ok(self.repository.list_active_sessions(owner_id)?)
    }

    /// Decodes a session row's state blob into its typed payload.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Corrupt`] if the row's game id is unknown or
    /// the blob fails per-game schema validation.
    pub fn load_state(&self, session: &GameSession) -> Result<GameState, GameError> {
        let kind = GameKind::parse(session.game_id()).ok_or_else(|| {
            GameError::Corrupt(format!(
                "session {} has unknown game id '{}'",
                session.id(),
                session.game_id()
            ))
        })?;
        GameState::from_blob(kind, session.state())
    }

    /// Applies one player action to a session and persists the result.
    ///
    /// Rejected moves and finished-already outcomes are returned as normal
    /// [`PlayResult`]s without touching the stored state.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if the session does not exist,
    /// [`GameError::InvalidState`] if the session has already ended or the
    /// action does not match its game type, and [`GameError::Storage`] if
    /// persisting the new state fails (in which case the move must not be
    /// assumed recorded).
    #[instrument(skip(self, action), fields(action = ?action.kind()))]
    pub fn play(&self, session_id: i32, action: PlayerAction) -> Result<PlayResult, GameError> {
        let session = self.session(session_id)?;

        if !*session.is_active() {
            warn!(session_id, "Play against ended session");
            return Err(GameError::InvalidState("session already ended".to_string()));
        }

        let mut state = self.load_state(&session)?;
        let outcome = games::apply_move(&mut state, &action)?;

        if outcome.mutated_state() {
            self.repository
                .update_session_state(session_id, state.to_blob()?)?;
        } else {
            debug!(session_id, ?outcome, "Move did not change state");
        }

        Ok(PlayResult { outcome, state })
    }

    /// Ends a session: derives the outcome, appends an immutable record,
    /// and deactivates the session.
    ///
    /// Ending an already-ended session succeeds and appends another record
    /// for the same session; see DESIGN.md for why this is kept.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if the session does not exist.
    #[instrument(skip(self))]
    pub fn end_session(&self, session_id: i32) -> Result<GameRecord, GameError> {
        let session = self.session(session_id)?;
        let state = self.load_state(&session)?;

        let (user_score, companion_score) = state.scores();
        let winner = Winner::from_scores(user_score, companion_score);

        let record = self.repository.append_record(NewGameRecord::new(
            session.game_id().clone(),
            session.owner_id().clone(),
            *session.id(),
            user_score,
            companion_score,
            state.rounds_played(),
            winner.to_db_string().to_string(),
        ))?;
        self.repository.deactivate_session(session_id)?;

        info!(
            session_id,
            record_id = record.id(),
            winner = %record.winner(),
            "Session ended"
        );
        Ok(record)
    }

    /// Lists an owner's records, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Storage`] on database failure.
    #[instrument(skip(self))]
    pub fn records(
        &self,
        owner_id: &str,
        game_id: Option<&str>,
        limit: i64,
    ) -> Result<Vec<GameRecord>, GameError> {
        Ok(self.repository.list_records(owner_id, game_id, Some(limit))?)
    }

    /// Aggregates win/loss/tie statistics over all of an owner's records.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Storage`] on database failure.
    #[instrument(skip(self))]
    pub fn statistics(&self, owner_id: &str) -> Result<GameStatistics, GameError> {
        let records = self.repository.list_records(owner_id, None, None)?;
        Ok(stats::aggregate(&records))
    }
}
