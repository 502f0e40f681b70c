//! REST API surface for the games backend.
//!
//! Routes mirror the shapes the companion app's frontend already speaks:
//! session and record bodies carry the parsed state object, rejected moves
//! come back as ordinary 200 responses with `valid: false`, and only
//! NotFound / InvalidState / storage failures map to error statuses.

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, error, info, instrument, warn};

use crate::db::{GameRecord, GameSession};
use crate::error::GameError;
use crate::games::{self, MoveOutcome, PlayerAction};
use crate::service::{GameService, PlayResult};

/// Request body for creating a game session.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    /// Game type to play.
    pub game_id: String,
    /// Companion this session belongs to. Existence is the caller's
    /// concern; the value is stored as an opaque string.
    pub owner_id: String,
}

/// Request body for a word-chain move.
#[derive(Debug, Clone, Deserialize)]
pub struct WordChainPlayRequest {
    /// The proposed word.
    pub word: String,
}

/// Request body for a trivia answer.
#[derive(Debug, Clone, Deserialize)]
pub struct TriviaAnswerRequest {
    /// The free-text answer.
    pub answer: String,
}

/// Request body for a guess-the-number move.
#[derive(Debug, Clone, Deserialize)]
pub struct GuessNumberPlayRequest {
    /// The integer guess.
    pub guess: i64,
}

/// Query parameters for the records listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordsQuery {
    /// Owner whose records to list.
    pub owner_id: String,
    /// Optional game id filter.
    pub game_id: Option<String>,
    /// Maximum records to return (default 20).
    pub limit: Option<i64>,
}

/// Query parameters for the statistics endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsQuery {
    /// Owner whose statistics to compute.
    pub owner_id: String,
}

/// HTTP wrapper around [`GameError`] carrying its status mapping.
#[derive(Debug)]
pub struct ApiError(GameError);

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            GameError::NotFound(_) => StatusCode::NOT_FOUND,
            GameError::InvalidState(_) => StatusCode::BAD_REQUEST,
            GameError::Corrupt(_) | GameError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        } else {
            warn!(error = %self.0, status = %status, "Request rejected");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Builds the games API router over a shared service handle.
pub fn router(service: GameService) -> Router {
    Router::new()
        .route("/games", get(list_games))
        .route("/games/records", get(list_records))
        .route("/games/stats", get(get_statistics))
        .route("/games/sessions", post(create_session))
        .route("/games/sessions/active/{owner_id}", get(active_sessions))
        .route("/games/sessions/{id}", get(get_session))
        .route("/games/sessions/{id}/end", post(end_session))
        .route("/games/sessions/{id}/word-chain", post(play_word_chain))
        .route("/games/sessions/{id}/trivia", post(play_trivia))
        .route("/games/sessions/{id}/guess-number", post(play_guess_number))
        .route("/games/{game_id}", get(get_game))
        .with_state(service)
}

/// `GET /games` - the full catalog.
#[instrument]
async fn list_games() -> Json<Value> {
    debug!("Listing games");
    Json(json!(games::list_games()))
}

/// `GET /games/{game_id}` - one catalog entry or 404.
#[instrument]
async fn get_game(Path(game_id): Path<String>) -> Result<Json<Value>, ApiError> {
    let game = games::get_game(&game_id)
        .ok_or_else(|| GameError::NotFound(format!("game '{game_id}'")))?;
    Ok(Json(json!(game)))
}

/// `POST /games/sessions` - idempotent session start.
#[instrument(skip(service, req), fields(game_id = %req.game_id, owner_id = %req.owner_id))]
async fn create_session(
    State(service): State<GameService>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<Value>, ApiError> {
    info!("Creating session");
    let session = service.start_session(&req.game_id, &req.owner_id)?;
    Ok(Json(session_body(&service, &session)?))
}

/// `GET /games/sessions/{id}` - one session with parsed state.
#[instrument(skip(service))]
async fn get_session(
    State(service): State<GameService>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let session = service.session(id)?;
    Ok(Json(session_body(&service, &session)?))
}

/// `GET /games/sessions/active/{owner_id}` - all active sessions.
#[instrument(skip(service))]
async fn active_sessions(
    State(service): State<GameService>,
    Path(owner_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let sessions = service.active_sessions(&owner_id)?;
    let bodies = sessions
        .iter()
        .map(|s| session_body(&service, s))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(Value::Array(bodies)))
}

/// `POST /games/sessions/{id}/end` - end and record the session.
#[instrument(skip(service))]
async fn end_session(
    State(service): State<GameService>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    info!(session_id = id, "Ending session");
    let record = service.end_session(id)?;
    Ok(Json(record_body(&record)))
}

/// `POST /games/sessions/{id}/word-chain` - play a word.
#[instrument(skip(service, req))]
async fn play_word_chain(
    State(service): State<GameService>,
    Path(id): Path<i32>,
    Json(req): Json<WordChainPlayRequest>,
) -> Result<Json<Value>, ApiError> {
    let result = service.play(id, PlayerAction::Word(req.word))?;
    Ok(Json(play_body(&result)))
}

/// `POST /games/sessions/{id}/trivia` - answer the current question.
#[instrument(skip(service, req))]
async fn play_trivia(
    State(service): State<GameService>,
    Path(id): Path<i32>,
    Json(req): Json<TriviaAnswerRequest>,
) -> Result<Json<Value>, ApiError> {
    let result = service.play(id, PlayerAction::Answer(req.answer))?;
    Ok(Json(play_body(&result)))
}

/// `POST /games/sessions/{id}/guess-number` - make a guess.
#[instrument(skip(service, req))]
async fn play_guess_number(
    State(service): State<GameService>,
    Path(id): Path<i32>,
    Json(req): Json<GuessNumberPlayRequest>,
) -> Result<Json<Value>, ApiError> {
    let result = service.play(id, PlayerAction::Guess(req.guess))?;
    Ok(Json(play_body(&result)))
}

/// `GET /games/records` - an owner's records, newest first.
#[instrument(skip(service))]
async fn list_records(
    State(service): State<GameService>,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<Value>, ApiError> {
    let records = service.records(
        &query.owner_id,
        query.game_id.as_deref(),
        query.limit.unwrap_or(20),
    )?;
    let bodies: Vec<Value> = records.iter().map(record_body).collect();
    Ok(Json(Value::Array(bodies)))
}

/// `GET /games/stats` - aggregated statistics for an owner.
#[instrument(skip(service))]
async fn get_statistics(
    State(service): State<GameService>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Value>, ApiError> {
    let stats = service.statistics(&query.owner_id)?;
    Ok(Json(json!(stats)))
}

fn session_body(service: &GameService, session: &GameSession) -> Result<Value, GameError> {
    let state = service.load_state(session)?;
    Ok(json!({
        "id": session.id(),
        "game_id": session.game_id(),
        "owner_id": session.owner_id(),
        "state": state.to_value(),
        "is_active": session.is_active(),
        "created_at": session.created_at().and_utc().to_rfc3339(),
        "updated_at": session.updated_at().and_utc().to_rfc3339(),
    }))
}

fn record_body(record: &GameRecord) -> Value {
    json!({
        "id": record.id(),
        "game_id": record.game_id(),
        "owner_id": record.owner_id(),
        "session_id": record.session_id(),
        "user_score": record.user_score(),
        "companion_score": record.companion_score(),
        "rounds_played": record.rounds_played(),
        "winner": record.winner(),
        "played_at": record.played_at().and_utc().to_rfc3339(),
    })
}

fn play_body(result: &PlayResult) -> Value {
    let state = result.state.to_value();
    match &result.outcome {
        MoveOutcome::Rejected { reason } => json!({
            "valid": false,
            "error": reason,
            "state": state,
        }),
        MoveOutcome::Finished { reason } => json!({
            "error": reason,
            "finished": true,
        }),
        MoveOutcome::Word { word } => json!({
            "valid": true,
            "word": word,
            "state": state,
        }),
        MoveOutcome::Trivia {
            correct,
            correct_answer,
            finished,
        } => json!({
            "correct": correct,
            "correct_answer": correct_answer,
            "finished": finished,
            "state": state,
        }),
        MoveOutcome::Guess {
            guess,
            hint,
            finished,
            won,
            target,
        } => json!({
            "guess": guess,
            "hint": hint,
            "finished": finished,
            "won": won,
            "target": target,
            "state": state,
        }),
    }
}
