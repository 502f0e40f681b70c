//! Read-only statistics reduction over an owner's game records.

use std::collections::BTreeMap;

use derive_getters::Getters;
use serde::Serialize;
use tracing::{instrument, warn};

use crate::db::GameRecord;

/// Per-game-type play counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Getters)]
pub struct GameTypeStats {
    played: i32,
    wins: i32,
}

/// Aggregated statistics for one owner, from the owner's perspective.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Getters)]
pub struct GameStatistics {
    total_games: i32,
    total_user_score: i32,
    total_companion_score: i32,
    wins: i32,
    losses: i32,
    ties: i32,
    games_by_type: BTreeMap<String, GameTypeStats>,
}

/// Reduces an owner's records into aggregate counts.
///
/// Zero records produce an all-zero structure with an empty per-type map.
/// Records with an unrecognized winner value still count toward totals but
/// are logged and excluded from the win/loss/tie tally.
#[instrument(skip(records), fields(count = records.len()))]
pub fn aggregate(records: &[GameRecord]) -> GameStatistics {
    let mut stats = GameStatistics {
        total_games: records.len() as i32,
        ..GameStatistics::default()
    };

    for record in records {
        stats.total_user_score += *record.user_score();
        stats.total_companion_score += *record.companion_score();

        let per_game = stats
            .games_by_type
            .entry(record.game_id().clone())
            .or_default();
        per_game.played += 1;

        match record.winner().as_str() {
            "user" => {
                stats.wins += 1;
                per_game.wins += 1;
            }
            "companion" => stats.losses += 1,
            "tie" => stats.ties += 1,
            other => {
                warn!(winner = %other, record_id = record.id(), "Unknown winner value")
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_records_aggregate_to_zero() {
        let stats = aggregate(&[]);
        assert_eq!(stats, GameStatistics::default());
        assert!(stats.games_by_type().is_empty());
    }
}
