//! Turn orchestration: one player move followed by one engine reply.
//!
//! ```text
//! AwaitingPlayerMove --move--> SearchingEngineMove --reply--> AwaitingPlayerMove
//!         |                            |
//!         +--player mates--> GameOver  +--engine mates--> GameOver
//! ```
//!
//! `GameOver` is left only through `undo` or `reset`. Every failed request
//! leaves history exactly as it was.

use super::codec::{DisplayGrid, mirror_move, parse_move_text, render_move, to_display_grid};
use super::error::GameError;
use super::history::SessionHistory;
use super::outcome::{GameOutcome, after_engine_search, after_player_move};
use crate::engine::{Engine, MATE_UPPER, Position, SearchReport};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// Winner of a finished game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::IntoStaticStr,
)]
pub enum Winner {
    /// The human player.
    #[serde(rename = "player")]
    #[strum(serialize = "player")]
    Player,
    /// The engine.
    #[serde(rename = "ai")]
    #[strum(serialize = "ai")]
    Engine,
}

/// Where the session is in its move cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnState {
    /// Waiting for the player's move.
    AwaitingPlayerMove,
    /// The engine is choosing its reply.
    SearchingEngineMove,
    /// The game has ended.
    GameOver {
        /// Who won.
        winner: Winner,
    },
}

impl TurnState {
    /// Winner, if the game has ended.
    pub fn winner(self) -> Option<Winner> {
        match self {
            TurnState::GameOver { winner } => Some(winner),
            _ => None,
        }
    }
}

/// What the player sees: board, score and undo availability.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct BoardView {
    /// Board in the player's orientation.
    board: DisplayGrid,
    /// Score from the player's point of view.
    score: i32,
    /// Whether another undo would succeed.
    can_undo_again: bool,
    /// Current state.
    state: TurnState,
}

/// Result of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct TurnReport {
    /// Engine reply in the player's frame, absent when the player won outright.
    engine_move: Option<String>,
    /// Depth the reply was found at.
    depth: Option<i32>,
    /// Board after the exchange.
    view: BoardView,
}

impl TurnReport {
    /// Human-readable summary of the exchange.
    pub fn message(&self) -> &'static str {
        match self.view.state.winner() {
            Some(Winner::Player) => "You won! (AI is checkmated)",
            Some(Winner::Engine) => "AI wins! You are checkmated.",
            None => "AI moved. Your turn.",
        }
    }
}

/// Drives one game: validates player moves, runs the engine, tracks outcome.
pub struct TurnOrchestrator {
    engine: Box<dyn Engine>,
    history: SessionHistory,
    state: TurnState,
    think_time: Duration,
}

impl std::fmt::Debug for TurnOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnOrchestrator")
            .field("history_len", &self.history.len())
            .field("state", &self.state)
            .field("think_time", &self.think_time)
            .finish()
    }
}

impl TurnOrchestrator {
    /// Starts a game with `engine`, which must be fresh.
    #[instrument(skip(engine))]
    pub fn new(engine: Box<dyn Engine>, think_time: Duration) -> Self {
        let history = SessionHistory::new(engine.initial_position());
        Self {
            engine,
            history,
            state: TurnState::AwaitingPlayerMove,
            think_time,
        }
    }

    /// Current state.
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Game record.
    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    /// Search budget per engine reply.
    pub fn think_time(&self) -> Duration {
        self.think_time
    }

    /// Discards the game and starts over with a fresh `engine`.
    #[instrument(skip(self, engine), fields(history_len = self.history.len()))]
    pub fn reset(&mut self, engine: Box<dyn Engine>) {
        self.history = SessionHistory::new(engine.initial_position());
        self.engine = engine;
        self.state = TurnState::AwaitingPlayerMove;
        info!("Game reset");
    }

    /// Board, score and undo availability as the player sees them.
    pub fn view(&self) -> BoardView {
        let tail = self.history.tail();
        let (board, score) = if self.history.player_to_move() {
            (to_display_grid(tail), tail.score())
        } else {
            // The player's mating move is the tail; turn it back to face the player.
            let score = match self.state {
                TurnState::GameOver {
                    winner: Winner::Player,
                } => MATE_UPPER,
                _ => -tail.score(),
            };
            (to_display_grid(&tail.rotate()), score)
        };
        BoardView {
            board,
            score,
            can_undo_again: self.history.can_undo(),
            state: self.state,
        }
    }

    /// Plays the player's move and, unless that ends the game, the engine's reply.
    #[instrument(skip(self), fields(history_len = self.history.len()))]
    pub fn play(&mut self, move_text: &str) -> Result<TurnReport, GameError> {
        if let TurnState::GameOver { winner } = self.state {
            warn!(%winner, "Move rejected, game is over");
            return Err(GameError::GameOver(winner));
        }

        let mv = parse_move_text(move_text).inspect_err(|e| warn!(error = %e, "Malformed move"))?;
        let current = self.history.tail().clone();
        if !self.engine.legal_moves(&current).contains(&mv) {
            warn!(move_text, "Illegal move");
            return Err(GameError::IllegalMove(move_text.to_string()));
        }

        let checkpoint = self.history.len();
        let after_player = self.engine.apply_move(&current, mv);
        self.history.push(after_player.clone());
        info!(move_text, engine_score = after_player.score(), "Player move applied");

        if after_player_move(after_player.score()) == GameOutcome::PlayerWins {
            self.state = TurnState::GameOver {
                winner: Winner::Player,
            };
            info!("Player delivered mate, search skipped");
            return Ok(TurnReport {
                engine_move: None,
                depth: None,
                view: self.view(),
            });
        }

        self.state = TurnState::SearchingEngineMove;
        let Some(report) = self.bounded_search(&after_player) else {
            error!("Engine search produced no move");
            self.history.truncate(checkpoint);
            self.state = TurnState::AwaitingPlayerMove;
            return Err(GameError::EngineProducedNoMove);
        };

        let reply = render_move(mirror_move(report.best_move));
        let after_engine = self.engine.apply_move(&after_player, report.best_move);
        self.history.push(after_engine);

        self.state = match after_engine_search(report.score) {
            GameOutcome::EngineWins => TurnState::GameOver {
                winner: Winner::Engine,
            },
            _ => TurnState::AwaitingPlayerMove,
        };
        info!(
            reply = %reply,
            depth = report.depth,
            search_score = report.score,
            state = ?self.state,
            "Engine reply applied"
        );

        Ok(TurnReport {
            engine_move: Some(reply),
            depth: Some(report.depth),
            view: self.view(),
        })
    }

    /// Pulls search results until the think time is spent or the engine stops.
    fn bounded_search(&mut self, position: &Position) -> Option<SearchReport> {
        let started = Instant::now();
        let mut best = None;
        for report in self.engine.search(position, self.history.positions()) {
            debug!(depth = report.depth, score = report.score, "Search iteration");
            best = Some(report);
            if started.elapsed() > self.think_time {
                debug!(depth = report.depth, "Think time reached");
                break;
            }
        }
        best
    }

    /// Takes back the last exchange.
    ///
    /// Normally that is two entries, the engine reply and the player move before
    /// it. After the player mated, the mating move alone is taken back.
    #[instrument(skip(self), fields(history_len = self.history.len()))]
    pub fn undo(&mut self) -> Result<BoardView, GameError> {
        let count = if self.history.player_to_move() { 2 } else { 1 };
        self.history
            .pop(count)
            .inspect_err(|e| warn!(error = %e, "Undo refused"))?;
        self.state = TurnState::AwaitingPlayerMove;
        info!(history_len = self.history.len(), "Undo applied");
        Ok(self.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::XiangqiEngine;
    use crate::game::error::UndoBlocker;

    const THINK: Duration = Duration::from_millis(20);

    fn fresh() -> TurnOrchestrator {
        TurnOrchestrator::new(Box::new(XiangqiEngine::new()), THINK)
    }

    #[test]
    fn test_rejections_leave_history_untouched() {
        let mut game = fresh();
        assert!(matches!(game.play("zz"), Err(GameError::MalformedMoveText(_))));
        assert!(matches!(game.play("a0a5"), Err(GameError::IllegalMove(_))));
        assert_eq!(
            game.undo(),
            Err(GameError::NothingToUndo(UndoBlocker::InitialState))
        );
        assert_eq!(game.history().len(), 1);
        assert_eq!(game.state(), TurnState::AwaitingPlayerMove);
    }

    #[test]
    fn test_exchange_appends_two_positions() {
        let mut game = fresh();
        let report = game.play("h2e2").unwrap();
        assert_eq!(game.history().len(), 3);
        assert_eq!(report.engine_move().as_deref().map(str::len), Some(4));
        assert_eq!(report.message(), "AI moved. Your turn.");
        assert!(*report.view().can_undo_again());
        // the player's cannon is on e2 in the player's frame
        assert_eq!(report.view().board().rows()[7].as_bytes()[4], b'C');
    }

    #[test]
    fn test_undo_restores_start() {
        let mut game = fresh();
        game.play("b0c2").unwrap();
        let view = game.undo().unwrap();
        assert_eq!(game.history().len(), 1);
        assert!(!view.can_undo_again());
        assert_eq!(view.board(), &to_display_grid(&Position::initial()));
    }

    #[test]
    fn test_capturing_the_general_ends_the_game() {
        let rows = [
            "....k....",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
            "....R....",
            "...K.....",
        ];
        let start = Position::from_rows(rows, 0).unwrap();
        let mut game = TurnOrchestrator::new(Box::new(XiangqiEngine::with_start(start)), THINK);
        let report = game.play("e1e9").unwrap();
        assert_eq!(report.engine_move(), &None);
        assert_eq!(*report.view().score(), MATE_UPPER);
        assert_eq!(report.message(), "You won! (AI is checkmated)");
        assert_eq!(
            game.state(),
            TurnState::GameOver {
                winner: Winner::Player
            }
        );
        assert_eq!(report.view().board().rows()[0], "....R....");
        assert_eq!(game.play("e9e8"), Err(GameError::GameOver(Winner::Player)));
    }

    #[test]
    fn test_reset_discards_history() {
        let mut game = fresh();
        game.play("h2e2").unwrap();
        game.reset(Box::new(XiangqiEngine::new()));
        assert_eq!(game.history().len(), 1);
        assert_eq!(game.state(), TurnState::AwaitingPlayerMove);
    }

    #[test]
    fn test_winner_names() {
        assert_eq!(Winner::Player.to_string(), "player");
        assert_eq!(serde_json::to_value(Winner::Engine).unwrap(), "ai");
    }
}
