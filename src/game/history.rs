//! Authoritative record of a game: every position reached, oldest first.

use super::error::{GameError, UndoBlocker};
use crate::engine::Position;
use tracing::{debug, instrument};

/// Append/undo stack of positions.
///
/// Entry 0 is the start position with the player to move; each later entry
/// flips the side to move. Never shorter than one entry.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    positions: Vec<Position>,
}

impl SessionHistory {
    /// History holding only `start`.
    pub fn new(start: Position) -> Self {
        Self {
            positions: vec![start],
        }
    }

    /// Number of positions recorded.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Current position.
    pub fn tail(&self) -> &Position {
        // the constructor guarantees at least one entry and `truncate` never goes below it
        &self.positions[self.positions.len() - 1]
    }

    /// All positions, oldest first.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// True when the tail has the player to move.
    pub fn player_to_move(&self) -> bool {
        self.positions.len() % 2 == 1
    }

    /// Records a new tail.
    pub fn push(&mut self, position: Position) {
        self.positions.push(position);
        debug!(len = self.positions.len(), "History extended");
    }

    /// Drops entries back to `len`, keeping at least the start position.
    pub fn truncate(&mut self, len: usize) {
        self.positions.truncate(len.max(1));
    }

    /// A move pair can be taken back.
    pub fn can_undo(&self) -> bool {
        self.positions.len() > 2
    }

    /// Checks that a move pair can be taken back, naming the reason if not.
    pub fn undo_blocker(&self) -> Option<UndoBlocker> {
        match self.positions.len() {
            0 | 1 => Some(UndoBlocker::InitialState),
            2 => Some(UndoBlocker::EngineNotReplied),
            _ => None,
        }
    }

    /// Removes the last `count` entries.
    #[instrument(skip(self), fields(len = self.positions.len()))]
    pub fn pop(&mut self, count: usize) -> Result<(), GameError> {
        if let Some(blocker) = self.undo_blocker() {
            return Err(GameError::NothingToUndo(blocker));
        }
        let len = self.positions.len().saturating_sub(count);
        self.truncate(len);
        Ok(())
    }
}
