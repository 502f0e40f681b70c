//! Game catalog, per-game state payloads, and the pure move engine.

mod catalog;
mod engine;
mod state;

pub use catalog::{GameDefinition, get_game, initial_state, list_games};
pub use engine::{Hint, MoveOutcome, PlayerAction, apply_move};
pub use state::{
    GameKind, GameState, GuessNumberState, TriviaAnswerRecord, TriviaQuestion, TriviaState, Turn,
    WordChainState,
};
