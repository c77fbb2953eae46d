//! Errors raised while driving a game session.

use super::orchestrator::Winner;
use serde::{Deserialize, Serialize};

/// Why an undo request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum UndoBlocker {
    /// Nothing has been played yet.
    #[display("Game at initial state, cannot undo.")]
    InitialState,
    /// The player has moved but no engine reply is on record.
    #[display("Cannot undo until AI has also made a move.")]
    EngineNotReplied,
}

/// Error that can occur when processing a session request.
///
/// Every variant leaves the session exactly as it was before the request.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// Move text is not two `<file><rank>` pairs.
    #[display("Please enter a move like h2e2 (got {:?})", _0)]
    MalformedMoveText(String),

    /// Well-formed move that is not legal in the current position.
    #[display("Invalid move: {}", _0)]
    IllegalMove(String),

    /// History too short to take back a move pair.
    #[display("{}", _0)]
    NothingToUndo(UndoBlocker),

    /// The game has ended; start a new one or undo first.
    #[display("Game is already over ({} won)", _0)]
    GameOver(Winner),

    /// The engine finished searching without proposing a move.
    #[display("AI Error: No move found")]
    EngineProducedNoMove,

    /// Request body lacks a required field.
    #[display("Missing {} parameter", _0)]
    MissingField(String),
}

impl GameError {
    /// True when the fault lies with the engine rather than the request.
    pub fn is_internal(&self) -> bool {
        matches!(self, GameError::EngineProducedNoMove)
    }
}

impl std::error::Error for GameError {}
