//! Session state payloads for each game type.
//!
//! A session row stores its state as a schemaless JSON blob; the blob is
//! decoded into the typed payload matching the session's game id on every
//! read and re-encoded on every write. A blob that does not match the
//! expected shape fails decoding with [`GameError::Corrupt`] instead of
//! leaking a malformed structure into game logic.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::GameError;

/// Identifier of a game type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    /// Chinese idiom chain (成语接龙).
    WordChain,
    /// Multiple-choice trivia quiz.
    Trivia,
    /// Guess a number in [1, 100] with higher/lower hints.
    GuessNumber,
}

impl GameKind {
    /// All game kinds in catalog order.
    pub const ALL: [GameKind; 3] = [
        GameKind::WordChain,
        GameKind::Trivia,
        GameKind::GuessNumber,
    ];

    /// Converts the kind to the string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WordChain => "word_chain",
            Self::Trivia => "trivia",
            Self::GuessNumber => "guess_number",
        }
    }

    /// Parses a kind from the string stored in the database.
    /// Returns `None` for unknown game ids.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "word_chain" => Some(Self::WordChain),
            "trivia" => Some(Self::Trivia),
            "guess_number" => Some(Self::GuessNumber),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whose turn it is in a word-chain game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    /// The user plays next.
    User,
    /// The companion plays next.
    Companion,
}

/// State of a word-chain (成语接龙) session.
///
/// `turn` flips to [`Turn::Companion`] after every accepted user word, but
/// no companion move logic exists yet; the field is carried so a companion
/// player can be added without a schema change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordChainState {
    /// Word the next move must chain from; `None` before the first move.
    pub current_word: Option<String>,
    /// Every word accepted so far, in play order.
    pub words_used: Vec<String>,
    /// User's score (one point per accepted word).
    pub user_score: i32,
    /// Companion's score.
    pub companion_score: i32,
    /// Whose turn it is.
    pub turn: Turn,
    /// Rounds played.
    pub rounds: i32,
}

/// One question in a trivia session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriviaQuestion {
    /// Question text.
    pub question: String,
    /// The correct answer (exact match required).
    pub answer: String,
    /// Four answer choices.
    pub options: Vec<String>,
}

/// Record of one answered trivia question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriviaAnswerRecord {
    /// Question text.
    pub question: String,
    /// What the user answered.
    pub user_answer: String,
    /// The correct answer.
    pub correct_answer: String,
    /// Whether the user's answer matched.
    pub correct: bool,
}

/// State of a trivia session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriviaState {
    /// Questions sampled for this session.
    pub questions: Vec<TriviaQuestion>,
    /// Index of the next unanswered question.
    pub current_index: usize,
    /// User's score (one point per correct answer).
    pub user_score: i32,
    /// Companion's score.
    pub companion_score: i32,
    /// Answers given so far.
    pub answers: Vec<TriviaAnswerRecord>,
}

/// State of a guess-the-number session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessNumberState {
    /// The number to guess.
    pub target: i64,
    /// Lower bound of the remaining range (narrowed by low guesses).
    pub min_range: i64,
    /// Upper bound of the remaining range (narrowed by high guesses).
    pub max_range: i64,
    /// Guesses made so far, in order.
    pub guesses: Vec<i64>,
    /// Maximum number of guesses allowed.
    pub max_guesses: u32,
    /// Whether the target has been hit.
    pub won: bool,
    /// User's score, set once when the target is hit.
    #[serde(default)]
    pub user_score: i32,
}

/// Tagged union over the per-game state payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum GameState {
    /// Word-chain state.
    WordChain(WordChainState),
    /// Trivia state.
    Trivia(TriviaState),
    /// Guess-the-number state.
    GuessNumber(GuessNumberState),
}

impl GameState {
    /// Returns the game kind this state belongs to.
    pub fn kind(&self) -> GameKind {
        match self {
            Self::WordChain(_) => GameKind::WordChain,
            Self::Trivia(_) => GameKind::Trivia,
            Self::GuessNumber(_) => GameKind::GuessNumber,
        }
    }

    /// Decodes a stored state blob into the payload expected for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Corrupt`] if the blob does not match the
    /// per-game schema.
    #[instrument(skip(raw), fields(kind = %kind))]
    pub fn from_blob(kind: GameKind, raw: &str) -> Result<Self, GameError> {
        let corrupt =
            |e: serde_json::Error| GameError::Corrupt(format!("{kind} state blob: {e}"));
        match kind {
            GameKind::WordChain => {
                Ok(Self::WordChain(serde_json::from_str(raw).map_err(corrupt)?))
            }
            GameKind::Trivia => Ok(Self::Trivia(serde_json::from_str(raw).map_err(corrupt)?)),
            GameKind::GuessNumber => {
                Ok(Self::GuessNumber(serde_json::from_str(raw).map_err(corrupt)?))
            }
        }
    }

    /// Encodes the state into the JSON blob stored in the session row.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Corrupt`] if serialization fails.
    pub fn to_blob(&self) -> Result<String, GameError> {
        let encoded = match self {
            Self::WordChain(s) => serde_json::to_string(s),
            Self::Trivia(s) => serde_json::to_string(s),
            Self::GuessNumber(s) => serde_json::to_string(s),
        };
        encoded.map_err(|e| GameError::Corrupt(format!("encoding {} state: {e}", self.kind())))
    }

    /// Renders the state as a JSON value for API responses.
    pub fn to_value(&self) -> serde_json::Value {
        let value = match self {
            Self::WordChain(s) => serde_json::to_value(s),
            Self::Trivia(s) => serde_json::to_value(s),
            Self::GuessNumber(s) => serde_json::to_value(s),
        };
        value.unwrap_or(serde_json::Value::Null)
    }

    /// Returns `(user_score, companion_score)` for outcome derivation.
    pub fn scores(&self) -> (i32, i32) {
        match self {
            Self::WordChain(s) => (s.user_score, s.companion_score),
            Self::Trivia(s) => (s.user_score, s.companion_score),
            Self::GuessNumber(s) => (s.user_score, 0),
        }
    }

    /// Rounds played, from the per-game progress counter.
    ///
    /// Word chain counts `rounds`, trivia counts answered questions, and
    /// guess-the-number tracks no round counter at all.
    pub fn rounds_played(&self) -> i32 {
        match self {
            Self::WordChain(s) => s.rounds,
            Self::Trivia(s) => s.current_index as i32,
            Self::GuessNumber(_) => 0,
        }
    }
}
