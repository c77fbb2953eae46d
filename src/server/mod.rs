//! HTTP front ends over the session manager.
//!
//! Two transports share one [`SessionManager`]: the JSON API at the root and
//! the compact classic encoding under `/classic`. They differ only in how
//! requests and results are encoded.

mod api;
mod classic;

pub use api::{MoveRequest, Turn};

use crate::config::ServerConfig;
use crate::engine::EngineFactory;
use crate::session::{DEFAULT_SESSION, SessionId, SessionManager};
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request},
    routing::{get, post},
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinError;
use tower::ServiceBuilder;
use tracing::{debug, info, instrument};

/// Request header naming the session.
pub const SESSION_HEADER: &str = "x-session-id";

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// All live games.
    pub sessions: SessionManager,
}

/// Builds the full router over `sessions`.
#[instrument(skip(sessions))]
pub fn router(sessions: SessionManager) -> Router {
    let state = AppState { sessions };
    Router::new()
        .route("/new_game", post(api::new_game))
        .route("/move", post(api::make_move))
        .route("/undo", post(api::undo))
        .route("/health", get(api::health))
        .route("/sessions", get(api::list_sessions))
        .nest("/classic", classic::router())
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(state)
}

/// Session named by the request, or the default one.
pub(crate) fn session_id(headers: &HeaderMap) -> SessionId {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(DEFAULT_SESSION)
        .to_string()
}

/// Runs session work on the blocking pool; searches hold a session lock for
/// up to the think time.
pub(crate) async fn blocking<R, F>(state: &AppState, work: F) -> Result<R, JoinError>
where
    R: Send + 'static,
    F: FnOnce(&SessionManager) -> R + Send + 'static,
{
    let sessions = state.sessions.clone();
    tokio::task::spawn_blocking(move || work(&sessions)).await
}

/// Periodically discards sessions idle longer than `ttl`.
pub fn spawn_reaper(
    sessions: SessionManager,
    every: Duration,
    ttl: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = tokio::time::interval(every);
        ticks.tick().await;
        loop {
            ticks.tick().await;
            let removed = sessions.reap_idle(ttl);
            if removed > 0 {
                info!(removed, "Reaped idle sessions");
            } else {
                debug!("No idle sessions");
            }
        }
    })
}

/// Binds to the configured address and serves until the process stops.
#[instrument(skip(config, factory), fields(host = %config.host(), port = config.port()))]
pub async fn serve(config: &ServerConfig, factory: EngineFactory) -> std::io::Result<()> {
    let sessions = SessionManager::new(factory, config.think_time());
    let _reaper = spawn_reaper(sessions.clone(), config.reap_interval(), config.session_ttl());

    let listener = TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(addr = %listener.local_addr()?, think_time_ms = config.think_time_ms(), "Server ready");
    axum::serve(listener, router(sessions)).await
}
