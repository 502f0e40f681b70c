//! Static registry of playable games and their initial states.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, instrument};

use super::state::{
    GameKind, GameState, GuessNumberState, TriviaQuestion, TriviaState, Turn, WordChainState,
};

/// Metadata for one playable game. Defined at process start, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct GameDefinition {
    /// Game identifier.
    pub id: GameKind,
    /// Display name.
    pub name: &'static str,
    /// Category tag.
    #[serde(rename = "type")]
    pub category: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Rules text shown to the player.
    pub rules: &'static str,
}

static CATALOG: [GameDefinition; 3] = [
    GameDefinition {
        id: GameKind::WordChain,
        name: "成语接龙",
        category: "word",
        description: "接龙游戏，考验词汇量",
        rules: "用上一个成语的最后一个字作为下一个成语的开头",
    },
    GameDefinition {
        id: GameKind::Trivia,
        name: "知识问答",
        category: "trivia",
        description: "趣味问答，增长知识",
        rules: "回答问题，答对得分",
    },
    GameDefinition {
        id: GameKind::GuessNumber,
        name: "猜数字",
        category: "logic",
        description: "猜测数字，锻炼逻辑",
        rules: "猜测1-100之间的数字，根据提示缩小范围",
    },
];

/// Question pool for trivia sessions: (question, answer, options).
const TRIVIA_POOL: [(&str, &str, [&str; 4]); 5] = [
    (
        "地球上最大的海洋是什么？",
        "太平洋",
        ["太平洋", "大西洋", "印度洋", "北冰洋"],
    ),
    (
        "光的速度大约是多少？",
        "30万公里/秒",
        ["30万公里/秒", "3万公里/秒", "300万公里/秒", "3000公里/秒"],
    ),
    (
        "中国最长的河流是什么？",
        "长江",
        ["黄河", "长江", "珠江", "淮河"],
    ),
    (
        "一年有多少天？",
        "365天",
        ["360天", "365天", "366天", "364天"],
    ),
    (
        "水的化学式是什么？",
        "H2O",
        ["H2O", "CO2", "O2", "NaCl"],
    ),
];

/// Number of questions sampled per trivia session.
const TRIVIA_SAMPLE: usize = 5;

/// Returns all available games in a fixed, stable order.
pub fn list_games() -> &'static [GameDefinition] {
    &CATALOG
}

/// Looks up a game by its string id. Returns `None` for unknown ids.
pub fn get_game(game_id: &str) -> Option<&'static GameDefinition> {
    let kind = GameKind::parse(game_id)?;
    CATALOG.iter().find(|g| g.id == kind)
}

/// Builds the starting state for a new session of the given game.
///
/// Trivia sessions draw a fresh question sample and guess-the-number
/// sessions draw a fresh target, so two calls differ in content but
/// always share the same structure.
#[instrument]
pub fn initial_state(kind: GameKind) -> GameState {
    debug!(game = %kind, "Building initial state");
    let mut rng = rand::thread_rng();
    match kind {
        GameKind::WordChain => GameState::WordChain(WordChainState {
            current_word: None,
            words_used: Vec::new(),
            user_score: 0,
            companion_score: 0,
            turn: Turn::User,
            rounds: 0,
        }),
        GameKind::Trivia => {
            let questions = TRIVIA_POOL
                .choose_multiple(&mut rng, TRIVIA_SAMPLE.min(TRIVIA_POOL.len()))
                .map(|(question, answer, options)| TriviaQuestion {
                    question: question.to_string(),
                    answer: answer.to_string(),
                    options: options.iter().map(|o| o.to_string()).collect(),
                })
                .collect();
            GameState::Trivia(TriviaState {
                questions,
                current_index: 0,
                user_score: 0,
                companion_score: 0,
                answers: Vec::new(),
            })
        }
        GameKind::GuessNumber => GameState::GuessNumber(GuessNumberState {
            target: rng.gen_range(1..=100),
            min_range: 1,
            max_range: 100,
            guesses: Vec::new(),
            max_guesses: 7,
            won: false,
            user_score: 0,
        }),
    }
}
