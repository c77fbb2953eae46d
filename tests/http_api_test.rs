//! JSON API driven in-process through the router.

mod common;

use axum::http::StatusCode;
use common::{SilentEngine, THINK, call, exposed_general, factory_from, mate_in_one};
use serde_json::{Value, json};
use strictly_xiangqi::{
    EngineFactory, MATE_UPPER, Position, SessionManager, XiangqiEngine, router, to_display_grid,
};

fn app_with(factory: EngineFactory) -> axum::Router {
    router(SessionManager::new(factory, THINK))
}

fn app() -> axum::Router {
    app_with(XiangqiEngine::factory())
}

fn initial_board() -> Value {
    serde_json::to_value(to_display_grid(&Position::initial())).unwrap()
}

#[tokio::test]
async fn test_new_game_response() {
    let app = app();
    let (status, body) = call(&app, "/new_game", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "New game started. Your turn.");
    assert_eq!(body["sessionId"], "default");
    assert_eq!(body["score"], 0);
    assert_eq!(body["turn"], "player");
    assert_eq!(body["canUndoAgain"], false);
    assert_eq!(body["board"], initial_board());
    assert_eq!(body["board"].as_array().map(Vec::len), Some(10));
}

#[tokio::test]
async fn test_move_and_undo_round_trip() {
    let app = app();
    let (status, body) = call(&app, "/move", None, Some(json!({ "move": "h2e2" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "AI moved. Your turn.");
    assert_eq!(body["move"].as_str().map(str::len), Some(4));
    assert_eq!(body["turn"], "player");
    assert_eq!(body["canUndoAgain"], true);
    assert!(body.get("winner").is_none());

    let (status, body) = call(&app, "/undo", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Undo successful. Your turn.");
    assert_eq!(body["turn"], "player");
    assert_eq!(body["canUndoAgain"], false);
    assert_eq!(body["score"], 0);
    assert_eq!(body["board"], initial_board());
}

#[tokio::test]
async fn test_malformed_move_is_rejected() {
    let app = app();
    let (status, body) = call(&app, "/move", None, Some(json!({ "move": "xx9yy9" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Please enter a move like h2e2"));
    assert_eq!(body["board"], initial_board());
    assert_eq!(body["score"], 0);
    assert_eq!(body["canUndoAgain"], false);
}

#[tokio::test]
async fn test_illegal_move_is_rejected() {
    let app = app();
    let (status, body) = call(&app, "/move", None, Some(json!({ "move": "a0a5" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid move: a0a5");
    assert_eq!(body["board"], initial_board());
}

#[tokio::test]
async fn test_missing_move_field() {
    let app = app();
    let (status, body) = call(&app, "/move", None, Some(json!({ "mv": "h2e2" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing move parameter");

    let (status, body) = call(&app, "/move", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing move parameter");
    assert_eq!(body["board"], initial_board());
}

#[tokio::test]
async fn test_undo_at_start() {
    let app = app();
    let (status, body) = call(&app, "/undo", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Game at initial state, cannot undo.");
    assert_eq!(body["turn"], "player");
    assert_eq!(body["canUndoAgain"], false);
}

#[tokio::test]
async fn test_player_mate() {
    let app = app_with(factory_from(mate_in_one()));
    let (status, body) = call(&app, "/move", None, Some(json!({ "move": "e1e9" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["turn"], "game_over");
    assert_eq!(body["winner"], "player");
    assert_eq!(body["move"], Value::Null);
    assert_eq!(body["score"], MATE_UPPER);
    assert_eq!(body["message"], "You won! (AI is checkmated)");

    let (status, body) = call(&app, "/move", None, Some(json!({ "move": "e9e8" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Game is already over (player won)");

    let (status, body) = call(&app, "/undo", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cannot undo until AI has also made a move.");
}

#[tokio::test]
async fn test_engine_mate() {
    let app = app_with(factory_from(exposed_general()));
    let (status, body) = call(&app, "/move", None, Some(json!({ "move": "a3a4" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["turn"], "game_over");
    assert_eq!(body["winner"], "ai");
    assert_eq!(body["move"], "e8e0");
    assert_eq!(body["message"], "AI wins! You are checkmated.");

    let (status, body) = call(&app, "/undo", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["turn"], "player");
}

#[tokio::test]
async fn test_engine_without_a_move_is_a_server_error() {
    let app = app_with(SilentEngine::factory());
    let (status, body) = call(&app, "/move", None, Some(json!({ "move": "h2e2" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "AI Error: No move found");
    assert_eq!(body["board"], initial_board());

    // nothing was committed
    let (_, body) = call(&app, "/undo", None, None).await;
    assert_eq!(body["error"], "Game at initial state, cannot undo.");
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let app = app();
    let (status, _) = call(&app, "/move", Some("alice"), Some(json!({ "move": "h2e2" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, "/undo", Some("bob"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(&app, "/undo", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["board"], initial_board());

    let (_, body) = call(&app, "/new_game", Some("carol"), None).await;
    assert_eq!(body["sessionId"], "carol");
}

#[tokio::test]
async fn test_health_and_session_listing() {
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    let app = app();
    call(&app, "/new_game", Some("zed"), None).await;
    call(&app, "/new_game", Some("amy"), None).await;

    let health = app
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .uri("/health")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);
    let text = health.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&text[..], b"ok");

    let listing = app
        .oneshot(
            axum::http::Request::builder()
                .uri("/sessions")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = listing.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "sessions": ["amy", "zed"] }));
}
