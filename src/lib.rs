//! Strictly Xiangqi - a human-versus-engine xiangqi session server
//!
//! # Architecture
//!
//! - **Engine**: the [`Engine`] trait plus the bundled [`XiangqiEngine`]
//! - **Game**: move-text codec, session history, outcome detection and the
//!   [`TurnOrchestrator`] state machine
//! - **Session**: one game per session id, locked per request
//! - **Server**: JSON API and the classic encoding over the same sessions
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use strictly_xiangqi::{TurnOrchestrator, XiangqiEngine};
//!
//! let mut game = TurnOrchestrator::new(Box::new(XiangqiEngine::new()), Duration::from_millis(500));
//! let report = game.play("h2e2").unwrap();
//! println!("{}", report.view().board());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod engine;
mod game;
mod repl;
mod server;
mod session;

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Engine adapter and bundled engine
pub use engine::{
    A0, A9, BOARD_LEN, DEFAULT_THINK_TIME, DISPLAY_COLS, DISPLAY_ORIGIN, DISPLAY_ROWS, Engine,
    EngineFactory, LayoutError, MATE_LOWER, MATE_UPPER, MAX_DEPTH, Move, Position, ROW_STRIDE,
    SQUARE_SPACE, SearchIter, SearchReport, Searcher, XiangqiEngine,
};

// Crate-level exports - Game protocol
pub use game::{
    BoardView, DisplayGrid, GameError, GameOutcome, SessionHistory, TurnOrchestrator, TurnReport,
    TurnState, UndoBlocker, Winner, after_engine_search, after_player_move, mirror_index,
    mirror_move, parse_move_text, render_move, render_square, to_display_grid,
};

// Crate-level exports - Sessions
pub use session::{DEFAULT_SESSION, GameSession, SessionId, SessionManager};

// Crate-level exports - HTTP transports
pub use server::{AppState, MoveRequest, SESSION_HEADER, Turn, router, serve, spawn_reaper};

// Crate-level exports - Terminal front end
pub use repl::run as run_terminal;
