//! Game-session protocol layered over an [`Engine`](crate::engine::Engine).
//!
//! The codec translates move text, the history records positions, the
//! outcome detector reads mate thresholds and the orchestrator ties them
//! into one move/undo state machine per session.

mod codec;
mod error;
mod history;
mod orchestrator;
mod outcome;

pub use codec::{
    DisplayGrid, mirror_index, mirror_move, parse_move_text, render_move, render_square,
    to_display_grid,
};
pub use error::{GameError, UndoBlocker};
pub use history::SessionHistory;
pub use orchestrator::{BoardView, TurnOrchestrator, TurnReport, TurnState, Winner};
pub use outcome::{GameOutcome, after_engine_search, after_player_move};
