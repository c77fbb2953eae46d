//! Game session management keyed by session id.

use crate::engine::EngineFactory;
use crate::game::{BoardView, GameError, TurnOrchestrator, TurnReport};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Session used when a request does not name one.
pub const DEFAULT_SESSION: &str = "default";

/// Locks `mutex`, recovering the data if a previous holder panicked.
pub(crate) fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("Lock poisoned by a panicked request, recovering");
        poisoned.into_inner()
    })
}

/// One player's game against the engine.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    game: TurnOrchestrator,
    last_active: Instant,
}

impl GameSession {
    /// Creates a session around a freshly started game.
    #[instrument(skip(game))]
    pub fn new(id: SessionId, game: TurnOrchestrator) -> Self {
        info!(session_id = %id, "Creating new game session");
        Self {
            id,
            game,
            last_active: Instant::now(),
        }
    }

    /// Session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The game being played.
    pub fn game(&self) -> &TurnOrchestrator {
        &self.game
    }

    /// Time since the last request touched this session.
    pub fn idle_for(&self) -> Duration {
        self.last_active.elapsed()
    }

    /// Plays one exchange. Blocks for up to the think time.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn play(&mut self, move_text: &str) -> Result<TurnReport, GameError> {
        self.last_active = Instant::now();
        self.game.play(move_text)
    }

    /// Takes back the last exchange.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn undo(&mut self) -> Result<BoardView, GameError> {
        self.last_active = Instant::now();
        self.game.undo()
    }

    /// Current board without changing anything.
    pub fn view(&mut self) -> BoardView {
        self.last_active = Instant::now();
        self.game.view()
    }
}

/// Manages all game sessions.
///
/// The map lock only guards lookups; it is released before any session lock
/// is taken, so a long search in one session never blocks another.
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, Arc<Mutex<GameSession>>>>>,
    factory: EngineFactory,
    think_time: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("think_time", &self.think_time)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a session manager whose games use engines from `factory`.
    #[instrument(skip(factory))]
    pub fn new(factory: EngineFactory, think_time: Duration) -> Self {
        info!("Creating session manager");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            factory,
            think_time,
        }
    }

    /// Search budget given to every game.
    pub fn think_time(&self) -> Duration {
        self.think_time
    }

    fn fresh_game(&self) -> TurnOrchestrator {
        TurnOrchestrator::new((self.factory)(), self.think_time)
    }

    /// Returns the session, starting a game for it if the id is new.
    #[instrument(skip(self))]
    pub fn get_or_create(&self, id: &str) -> Arc<Mutex<GameSession>> {
        let mut sessions = lock_or_recover(&self.sessions);
        if let Some(session) = sessions.get(id) {
            debug!(session_id = id, "Session found");
            return Arc::clone(session);
        }
        let session = Arc::new(Mutex::new(GameSession::new(id.to_string(), self.fresh_game())));
        sessions.insert(id.to_string(), Arc::clone(&session));
        info!(session_id = id, count = sessions.len(), "Created new session");
        session
    }

    /// Runs `f` with exclusive access to the session.
    ///
    /// Blocks while another request holds the same session; call from a
    /// blocking context when `f` searches.
    pub fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut GameSession) -> R) -> R {
        let session = self.get_or_create(id);
        let mut guard = lock_or_recover(&session);
        f(&mut guard)
    }

    /// Discards the session's game and starts a new one with a fresh engine.
    #[instrument(skip(self))]
    pub fn start_new_game(&self, id: &str) -> BoardView {
        let engine = (self.factory)();
        self.with_session(id, |session| {
            session.game.reset(engine);
            session.view()
        })
    }

    /// Ids of all live sessions, sorted.
    #[instrument(skip(self))]
    pub fn list(&self) -> Vec<SessionId> {
        let sessions = lock_or_recover(&self.sessions);
        let mut ids: Vec<_> = sessions.keys().cloned().collect();
        ids.sort();
        debug!(count = ids.len(), "Listed sessions");
        ids
    }

    /// Removes sessions idle for longer than `ttl`. Sessions busy with a
    /// request are kept. Returns how many were removed.
    #[instrument(skip(self))]
    pub fn reap_idle(&self, ttl: Duration) -> usize {
        let mut sessions = lock_or_recover(&self.sessions);
        let before = sessions.len();
        sessions.retain(|id, session| match session.try_lock() {
            Ok(guard) => {
                let keep = guard.idle_for() <= ttl;
                if !keep {
                    info!(session_id = %id, idle_secs = guard.idle_for().as_secs(), "Reaping idle session");
                }
                keep
            }
            Err(_) => true,
        });
        before - sessions.len()
    }
}
