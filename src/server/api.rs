//! JSON API: `/new_game`, `/move`, `/undo`, plus health and session listing.

use super::{AppState, blocking, session_id};
use crate::game::{BoardView, DisplayGrid, GameError, TurnReport, TurnState, Winner};
use crate::session::SessionId;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tokio::task::JoinError;
use tracing::{error, info, instrument, warn};

/// Body of `POST /move`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Player move text such as `h2e2`.
    #[serde(rename = "move")]
    pub move_text: String,
}

/// Whose turn the client should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Turn {
    /// The player may move.
    Player,
    /// The game has ended.
    GameOver,
}

impl From<TurnState> for Turn {
    fn from(state: TurnState) -> Self {
        match state {
            TurnState::GameOver { .. } => Turn::GameOver,
            _ => Turn::Player,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewGameResponse {
    message: &'static str,
    session_id: SessionId,
    board: DisplayGrid,
    score: i32,
    turn: Turn,
    can_undo_again: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveResponse {
    message: &'static str,
    #[serde(rename = "move")]
    engine_move: Option<String>,
    score: i32,
    board: DisplayGrid,
    turn: Turn,
    #[serde(skip_serializing_if = "Option::is_none")]
    winner: Option<Winner>,
    can_undo_again: bool,
}

impl From<TurnReport> for MoveResponse {
    fn from(report: TurnReport) -> Self {
        let view = report.view();
        Self {
            message: report.message(),
            engine_move: report.engine_move().clone(),
            score: *view.score(),
            board: view.board().clone(),
            turn: Turn::from(*view.state()),
            winner: view.state().winner(),
            can_undo_again: *view.can_undo_again(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UndoResponse {
    message: &'static str,
    board: DisplayGrid,
    score: i32,
    turn: Turn,
    can_undo_again: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error: String,
    board: DisplayGrid,
    score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    turn: Option<Turn>,
    can_undo_again: bool,
}

impl ErrorResponse {
    fn new(error: &GameError, view: &BoardView) -> Self {
        Self {
            error: error.to_string(),
            board: view.board().clone(),
            score: *view.score(),
            turn: None,
            can_undo_again: *view.can_undo_again(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SessionsResponse {
    sessions: Vec<SessionId>,
}

fn status_for(error: &GameError) -> StatusCode {
    if error.is_internal() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::BAD_REQUEST
    }
}

fn panicked(join: JoinError) -> Response {
    error!(error = %join, "Session task failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "internal error" })),
    )
        .into_response()
}

/// `POST /new_game`
#[instrument(skip(state, headers))]
pub(super) async fn new_game(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let id = session_id(&headers);
    let session = id.clone();
    let view = match blocking(&state, move |sessions| sessions.start_new_game(&session)).await {
        Ok(view) => view,
        Err(join) => return panicked(join),
    };
    info!(session_id = %id, "New game started");
    Json(NewGameResponse {
        message: "New game started. Your turn.",
        session_id: id,
        board: view.board().clone(),
        score: *view.score(),
        turn: Turn::Player,
        can_undo_again: false,
    })
    .into_response()
}

/// `POST /move`
#[instrument(skip(state, headers, body))]
pub(super) async fn make_move(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Response {
    let id = session_id(&headers);
    let move_text = match body {
        Ok(Json(request)) => Some(request.move_text),
        Err(rejection) => {
            warn!(session_id = %id, %rejection, "Move request without a usable body");
            None
        }
    };

    let result = blocking(&state, move |sessions| {
        sessions.with_session(&id, |session| {
            let outcome = match move_text {
                Some(text) => session.play(&text),
                None => Err(GameError::MissingField("move".to_string())),
            };
            outcome.map_err(|e| {
                let view = session.view();
                (e, view)
            })
        })
    })
    .await;

    match result {
        Ok(Ok(report)) => Json(MoveResponse::from(report)).into_response(),
        Ok(Err((e, view))) => (status_for(&e), Json(ErrorResponse::new(&e, &view))).into_response(),
        Err(join) => panicked(join),
    }
}

/// `POST /undo`
#[instrument(skip(state, headers))]
pub(super) async fn undo(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let id = session_id(&headers);
    let result = blocking(&state, move |sessions| {
        sessions.with_session(&id, |session| {
            session.undo().map_err(|e| {
                let view = session.view();
                (e, view)
            })
        })
    })
    .await;

    match result {
        Ok(Ok(view)) => Json(UndoResponse {
            message: "Undo successful. Your turn.",
            board: view.board().clone(),
            score: *view.score(),
            turn: Turn::Player,
            can_undo_again: *view.can_undo_again(),
        })
        .into_response(),
        Ok(Err((e, view))) => {
            let body = ErrorResponse {
                turn: Some(Turn::Player),
                can_undo_again: false,
                ..ErrorResponse::new(&e, &view)
            };
            (status_for(&e), Json(body)).into_response()
        }
        Err(join) => panicked(join),
    }
}

/// `GET /health`
pub(super) async fn health() -> &'static str {
    "ok"
}

/// `GET /sessions`
#[instrument(skip(state))]
pub(super) async fn list_sessions(State(state): State<AppState>) -> Response {
    Json(SessionsResponse {
        sessions: state.sessions.list(),
    })
    .into_response()
}
