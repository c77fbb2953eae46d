//! Engine adapter: the narrow interface the game protocol drives, plus the
//! bundled xiangqi engine that implements it.
//!
//! # Frames and scores
//!
//! A [`Position`] is always expressed from the side about to move. Applying a
//! move returns the board rotated half a turn (square `k` becomes
//! `SQUARE_SPACE - 1 - k`) with the score negated, so every entry of a game
//! history alternates perspective exactly once.

mod position;
mod searcher;
mod tables;

pub use position::{
    A0, A9, BOARD_LEN, DISPLAY_COLS, DISPLAY_ORIGIN, DISPLAY_ROWS, LayoutError, Move, Position,
    ROW_STRIDE, SQUARE_SPACE,
};
pub use searcher::{MAX_DEPTH, SearchIter, Searcher};
pub use tables::{MATE_LOWER, MATE_UPPER};

use derive_new::new;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Default wall-clock budget for one engine reply.
pub const DEFAULT_THINK_TIME: Duration = Duration::from_secs(1);

/// One completed search iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct SearchReport {
    /// Iteration depth.
    pub depth: i32,
    /// Best move, in the searched position's own frame.
    pub best_move: Move,
    /// Score of the searched position for its mover.
    pub score: i32,
}

/// Legality, move application and search for one game.
///
/// Implementations may cache between calls; a fresh instance is used for every
/// new game.
pub trait Engine: Send {
    /// Start-of-game position, player to move.
    fn initial_position(&self) -> Position;

    /// Moves the mover may play in `position`.
    fn legal_moves(&self, position: &Position) -> Vec<Move>;

    /// Plays `mv` and returns the rotated result.
    fn apply_move(&self, position: &Position, mv: Move) -> Position;

    /// Successively deeper results for `position`. The sequence may be
    /// unbounded; callers stop pulling when their time budget is spent.
    fn search<'a>(
        &'a mut self,
        position: &Position,
        history: &[Position],
    ) -> Box<dyn Iterator<Item = SearchReport> + 'a>;
}

/// Builds a fresh engine for each new game.
pub type EngineFactory = Arc<dyn Fn() -> Box<dyn Engine> + Send + Sync>;

/// The bundled engine.
#[derive(Debug, Default)]
pub struct XiangqiEngine {
    start: Position,
    searcher: Searcher,
}

impl XiangqiEngine {
    /// Engine starting from the standard layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose games begin at `start` instead of the standard layout.
    pub fn with_start(start: Position) -> Self {
        Self {
            start,
            searcher: Searcher::new(),
        }
    }

    /// Factory producing standard engines.
    pub fn factory() -> EngineFactory {
        Arc::new(|| Box::new(XiangqiEngine::new()) as Box<dyn Engine>)
    }
}

impl Engine for XiangqiEngine {
    fn initial_position(&self) -> Position {
        self.start.clone()
    }

    fn legal_moves(&self, position: &Position) -> Vec<Move> {
        position.moves()
    }

    fn apply_move(&self, position: &Position, mv: Move) -> Position {
        position.apply(mv)
    }

    #[instrument(skip_all)]
    fn search<'a>(
        &'a mut self,
        position: &Position,
        history: &[Position],
    ) -> Box<dyn Iterator<Item = SearchReport> + 'a> {
        Box::new(self.searcher.search(position, history))
    }
}
