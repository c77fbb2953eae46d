//! Classic encoding under `/classic`.

mod common;

use axum::http::StatusCode;
use common::{SilentEngine, THINK, call, factory_from, mate_in_one};
use serde_json::json;
use strictly_xiangqi::{EngineFactory, MATE_UPPER, SessionManager, XiangqiEngine, router};

fn app_with(factory: EngineFactory) -> axum::Router {
    router(SessionManager::new(factory, THINK))
}

fn keys(body: &serde_json::Value) -> Vec<&str> {
    let mut keys: Vec<&str> = body
        .as_object()
        .map(|map| map.keys().map(String::as_str).collect())
        .unwrap_or_default();
    keys.sort();
    keys
}

#[tokio::test]
async fn test_classic_move_body() {
    let app = app_with(XiangqiEngine::factory());
    let (status, body) = call(&app, "/classic/move", None, Some(json!({ "move": "h2e2" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(keys(&body), vec!["board", "move", "score"]);
    assert_eq!(body["move"].as_str().map(str::len), Some(4));
}

#[tokio::test]
async fn test_classic_errors_carry_only_a_message() {
    let app = app_with(XiangqiEngine::factory());
    let (status, body) = call(&app, "/classic/move", None, Some(json!({ "move": "a0a5" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid move: a0a5" }));

    let (status, body) = call(&app, "/classic/move", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing move parameter" }));

    let (status, body) = call(&app, "/classic/undo", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Game at initial state, cannot undo." }));
}

#[tokio::test]
async fn test_classic_player_win_message() {
    let app = app_with(factory_from(mate_in_one()));
    let (status, body) = call(&app, "/classic/move", None, Some(json!({ "move": "e1e9" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["move"], "You won! (AI is checkmated)");
    assert_eq!(body["score"], MATE_UPPER);
}

#[tokio::test]
async fn test_classic_engine_failure() {
    let app = app_with(SilentEngine::factory());
    let (status, body) = call(&app, "/classic/move", None, Some(json!({ "move": "h2e2" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "AI Error: No move found" }));
}

#[tokio::test]
async fn test_classic_and_json_api_share_sessions() {
    let app = app_with(XiangqiEngine::factory());
    call(&app, "/classic/move", Some("s1"), Some(json!({ "move": "h2e2" }))).await;

    let (status, body) = call(&app, "/undo", Some("s1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["canUndoAgain"], false);

    call(&app, "/move", Some("s1"), Some(json!({ "move": "b2e2" }))).await;
    let (status, body) = call(&app, "/classic/new_game", Some("s1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(keys(&body), vec!["board", "message", "score"]);
    assert_eq!(body["score"], 0);

    let (status, _) = call(&app, "/classic/undo", Some("s1"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
