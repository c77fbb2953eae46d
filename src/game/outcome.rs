//! Terminal-outcome detection from mate-threshold scores.
//!
//! The two checks look at different numbers on purpose. A player's mate is
//! visible on the board the engine is asked to move in. An engine's mate is
//! only known from the score its own search assigned to the line it chose.

use crate::engine::MATE_UPPER;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Result of classifying a position or search score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Play continues.
    Ongoing,
    /// The player has mated the engine.
    PlayerWins,
    /// The engine has mated the player.
    EngineWins,
}

impl GameOutcome {
    /// True for either win.
    pub fn is_decided(self) -> bool {
        !matches!(self, GameOutcome::Ongoing)
    }
}

/// Checks the position reached by the player's move, scored for the engine.
#[instrument]
pub fn after_player_move(engine_score: i32) -> GameOutcome {
    if engine_score <= -MATE_UPPER {
        GameOutcome::PlayerWins
    } else {
        GameOutcome::Ongoing
    }
}

/// Checks the score the engine's search reported for its chosen line.
#[instrument]
pub fn after_engine_search(search_score: i32) -> GameOutcome {
    if search_score >= MATE_UPPER {
        GameOutcome::EngineWins
    } else {
        GameOutcome::Ongoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_win_threshold() {
        assert_eq!(after_player_move(-MATE_UPPER), GameOutcome::PlayerWins);
        assert_eq!(after_player_move(-MATE_UPPER - 500), GameOutcome::PlayerWins);
        assert_eq!(after_player_move(-MATE_UPPER + 1), GameOutcome::Ongoing);
        // a huge score for the engine is not a player win
        assert_eq!(after_player_move(MATE_UPPER), GameOutcome::Ongoing);
    }

    #[test]
    fn test_engine_win_threshold() {
        assert_eq!(after_engine_search(MATE_UPPER), GameOutcome::EngineWins);
        assert_eq!(after_engine_search(MATE_UPPER - 1), GameOutcome::Ongoing);
        assert_eq!(after_engine_search(-MATE_UPPER), GameOutcome::Ongoing);
    }

    #[test]
    fn test_is_decided() {
        assert!(!GameOutcome::Ongoing.is_decided());
        assert!(GameOutcome::PlayerWins.is_decided());
        assert!(GameOutcome::EngineWins.is_decided());
    }
}
