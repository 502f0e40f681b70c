//! Pure per-move state transitions for every game type.
//!
//! [`apply_move`] takes the session's current state and one player action
//! and either mutates the state (accepted move) or leaves it untouched
//! (rejected move or finished game). It performs no I/O; randomness lives
//! entirely in initial-state generation.

use serde::Serialize;
use tracing::{debug, instrument};

use super::state::{GameKind, GameState, TriviaAnswerRecord, Turn};
use crate::error::GameError;

/// A single player action, shaped per game type.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerAction {
    /// A proposed word for word chain.
    Word(String),
    /// A free-text trivia answer.
    Answer(String),
    /// An integer guess for guess-the-number.
    Guess(i64),
}

impl PlayerAction {
    /// The game kind this action applies to.
    pub fn kind(&self) -> GameKind {
        match self {
            Self::Word(_) => GameKind::WordChain,
            Self::Answer(_) => GameKind::Trivia,
            Self::Guess(_) => GameKind::GuessNumber,
        }
    }
}

/// Hint returned after a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Hint {
    /// The guess hit the target.
    Correct,
    /// The target is higher than the guess.
    Higher,
    /// The target is lower than the guess.
    Lower,
}

/// Result of applying one move.
///
/// `Rejected` and `Finished` are normal outcomes, not errors: the request
/// was well-formed, the rules just declined it, and the state is unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// The rules rejected the move; `reason` is user-facing text.
    Rejected {
        /// Why the move was rejected.
        reason: String,
    },
    /// The game was already over before this move.
    Finished {
        /// User-facing explanation.
        reason: String,
    },
    /// Word-chain move accepted.
    Word {
        /// The accepted word.
        word: String,
    },
    /// Trivia answer recorded.
    Trivia {
        /// Whether the answer matched exactly.
        correct: bool,
        /// The correct answer for this question.
        correct_answer: String,
        /// Whether all questions have now been answered.
        finished: bool,
    },
    /// Guess recorded.
    Guess {
        /// The guess that was made.
        guess: i64,
        /// Direction hint.
        hint: Hint,
        /// Whether the game is over (won or out of guesses).
        finished: bool,
        /// Whether the target was hit.
        won: bool,
        /// The target, revealed only once the game is finished.
        target: Option<i64>,
    },
}

impl MoveOutcome {
    /// Whether this outcome changed the session state.
    pub fn mutated_state(&self) -> bool {
        !matches!(self, Self::Rejected { .. } | Self::Finished { .. })
    }
}

/// Applies one player action to a session state.
///
/// Accepted moves mutate `state` in place; rejected or finished-already
/// outcomes leave it unchanged.
///
/// # Errors
///
/// Returns [`GameError::InvalidState`] when the action's shape does not
/// match the state's game type.
#[instrument(skip(state), fields(game = %state.kind()))]
pub fn apply_move(state: &mut GameState, action: &PlayerAction) -> Result<MoveOutcome, GameError> {
    match (state, action) {
        (GameState::WordChain(s), PlayerAction::Word(word)) => Ok(play_word(s, word)),
        (GameState::Trivia(s), PlayerAction::Answer(answer)) => Ok(play_trivia(s, answer)),
        (GameState::GuessNumber(s), PlayerAction::Guess(guess)) => Ok(play_guess(s, *guess)),
        (state, action) => Err(GameError::InvalidState(format!(
            "{} action sent to {} session",
            action.kind(),
            state.kind()
        ))),
    }
}

fn play_word(s: &mut super::state::WordChainState, word: &str) -> MoveOutcome {
    let Some(first) = word.chars().next() else {
        return MoveOutcome::Rejected {
            reason: "词语不能为空".to_string(),
        };
    };

    if s.words_used.iter().any(|w| w == word) {
        debug!(word, "Word already used");
        return MoveOutcome::Rejected {
            reason: "这个词已经用过了".to_string(),
        };
    }

    if let Some(current) = &s.current_word {
        // Chain rule: first character must equal the current word's last.
        if let Some(last) = current.chars().last() {
            if first != last {
                debug!(word, expected = %last, "Word does not chain");
                return MoveOutcome::Rejected {
                    reason: format!("需要以'{last}'开头"),
                };
            }
        }
    }

    s.words_used.push(word.to_string());
    s.current_word = Some(word.to_string());
    s.user_score += 1;
    s.rounds += 1;
    // No companion move exists yet; the turn marker flips anyway.
    s.turn = Turn::Companion;

    MoveOutcome::Word {
        word: word.to_string(),
    }
}

fn play_trivia(s: &mut super::state::TriviaState, answer: &str) -> MoveOutcome {
    let Some(question) = s.questions.get(s.current_index) else {
        return MoveOutcome::Finished {
            reason: "No more questions".to_string(),
        };
    };

    let correct = answer == question.answer;
    let correct_answer = question.answer.clone();
    let question_text = question.question.clone();

    if correct {
        s.user_score += 1;
    }
    s.answers.push(TriviaAnswerRecord {
        question: question_text,
        user_answer: answer.to_string(),
        correct_answer: correct_answer.clone(),
        correct,
    });
    s.current_index += 1;

    MoveOutcome::Trivia {
        correct,
        correct_answer,
        finished: s.current_index >= s.questions.len(),
    }
}

fn play_guess(s: &mut super::state::GuessNumberState, guess: i64) -> MoveOutcome {
    if s.won || s.guesses.len() >= s.max_guesses as usize {
        return MoveOutcome::Finished {
            reason: "Game already finished".to_string(),
        };
    }

    s.guesses.push(guess);

    let hint = if guess == s.target {
        s.won = true;
        // Fewer guesses, higher score; the final allowed guess still earns 1.
        s.user_score = s.max_guesses as i32 - s.guesses.len() as i32 + 1;
        Hint::Correct
    } else if guess < s.target {
        s.min_range = s.min_range.max(guess + 1);
        Hint::Higher
    } else {
        s.max_range = s.max_range.min(guess - 1);
        Hint::Lower
    };

    let finished = s.won || s.guesses.len() >= s.max_guesses as usize;

    MoveOutcome::Guess {
        guess,
        hint,
        finished,
        won: s.won,
        target: finished.then_some(s.target),
    }
}
