//! Compact encoding kept for older clients, mounted under `/classic`.
//!
//! Successful moves answer `{move, score, board}` where `move` carries the
//! engine reply or, once the game ends, the end-of-game message. Failures
//! answer `{error}` alone.

use super::api::MoveRequest;
use super::{AppState, blocking, session_id};
use crate::game::{DisplayGrid, GameError, TurnReport};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{error, instrument, warn};

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/move", post(make_move))
        .route("/undo", post(undo))
        .route("/new_game", post(new_game))
}

#[derive(Debug, Serialize)]
struct ClassicMove {
    #[serde(rename = "move")]
    reply: String,
    score: i32,
    board: DisplayGrid,
}

impl From<TurnReport> for ClassicMove {
    fn from(report: TurnReport) -> Self {
        let reply = match (report.view().state().winner(), report.engine_move()) {
            (None, Some(reply)) => reply.clone(),
            _ => report.message().to_string(),
        };
        Self {
            reply,
            score: *report.view().score(),
            board: report.view().board().clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassicUndo {
    message: &'static str,
    board: DisplayGrid,
    score: i32,
    turn: super::Turn,
    can_undo_again: bool,
}

#[derive(Debug, Serialize)]
struct ClassicNewGame {
    message: &'static str,
    board: DisplayGrid,
    score: i32,
}

fn failure(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

fn game_failure(e: &GameError) -> Response {
    let status = if e.is_internal() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::BAD_REQUEST
    };
    failure(status, e.to_string())
}

#[instrument(skip(state, headers, body))]
async fn make_move(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Response {
    let id = session_id(&headers);
    let text = match body {
        Ok(Json(request)) => request.move_text,
        Err(rejection) => {
            warn!(session_id = %id, %rejection, "Classic move without a usable body");
            return game_failure(&GameError::MissingField("move".to_string()));
        }
    };

    match blocking(&state, move |sessions| sessions.with_session(&id, |s| s.play(&text))).await {
        Ok(Ok(report)) => Json(ClassicMove::from(report)).into_response(),
        Ok(Err(e)) => game_failure(&e),
        Err(join) => {
            error!(error = %join, "Session task failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
        }
    }
}

#[instrument(skip(state, headers))]
async fn undo(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let id = session_id(&headers);
    match blocking(&state, move |sessions| sessions.with_session(&id, |s| s.undo())).await {
        Ok(Ok(view)) => Json(ClassicUndo {
            message: "Undo successful. Your turn.",
            board: view.board().clone(),
            score: *view.score(),
            turn: super::Turn::Player,
            can_undo_again: *view.can_undo_again(),
        })
        .into_response(),
        Ok(Err(e)) => game_failure(&e),
        Err(join) => {
            error!(error = %join, "Session task failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
        }
    }
}

#[instrument(skip(state, headers))]
async fn new_game(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let id = session_id(&headers);
    match blocking(&state, move |sessions| sessions.start_new_game(&id)).await {
        Ok(view) => Json(ClassicNewGame {
            message: "New game started. Your turn.",
            board: view.board().clone(),
            score: *view.score(),
        })
        .into_response(),
        Err(join) => {
            error!(error = %join, "Session task failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
        }
    }
}
