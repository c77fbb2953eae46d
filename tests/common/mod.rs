//! Shared test engines and helpers.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use strictly_xiangqi::{
    Engine, EngineFactory, Move, Position, SearchReport, XiangqiEngine, mirror_move,
    parse_move_text,
};

/// Short think time so engine replies come back quickly.
pub const THINK: Duration = Duration::from_millis(30);

/// Position from ten rows, top first, player to move.
pub fn layout(rows: [&str; 10]) -> Position {
    Position::from_rows(rows, 0).unwrap()
}

/// A move written by the engine in the player's frame, expressed in the
/// engine's own frame.
pub fn engine_move(text: &str) -> Move {
    mirror_move(parse_move_text(text).unwrap())
}

/// Bundled engine that counts how often it was asked to search.
pub struct CountingEngine {
    inner: XiangqiEngine,
    searches: Arc<AtomicUsize>,
}

impl CountingEngine {
    pub fn new(start: Position, searches: Arc<AtomicUsize>) -> Self {
        Self {
            inner: XiangqiEngine::with_start(start),
            searches,
        }
    }
}

impl Engine for CountingEngine {
    fn initial_position(&self) -> Position {
        self.inner.initial_position()
    }

    fn legal_moves(&self, position: &Position) -> Vec<Move> {
        self.inner.legal_moves(position)
    }

    fn apply_move(&self, position: &Position, mv: Move) -> Position {
        self.inner.apply_move(position, mv)
    }

    fn search<'a>(
        &'a mut self,
        position: &Position,
        history: &[Position],
    ) -> Box<dyn Iterator<Item = SearchReport> + 'a> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.inner.search(position, history)
    }
}

/// Engine whose search never produces a move.
pub struct SilentEngine(XiangqiEngine);

impl SilentEngine {
    pub fn new() -> Self {
        Self(XiangqiEngine::new())
    }

    pub fn factory() -> EngineFactory {
        Arc::new(|| Box::new(SilentEngine::new()) as Box<dyn Engine>)
    }
}

impl Engine for SilentEngine {
    fn initial_position(&self) -> Position {
        self.0.initial_position()
    }

    fn legal_moves(&self, position: &Position) -> Vec<Move> {
        self.0.legal_moves(position)
    }

    fn apply_move(&self, position: &Position, mv: Move) -> Position {
        self.0.apply_move(position, mv)
    }

    fn search<'a>(
        &'a mut self,
        _position: &Position,
        _history: &[Position],
    ) -> Box<dyn Iterator<Item = SearchReport> + 'a> {
        Box::new(std::iter::empty())
    }
}

/// Engine that answers with a fixed list of replies, one per search.
pub struct ScriptedEngine {
    inner: XiangqiEngine,
    replies: VecDeque<SearchReport>,
}

impl ScriptedEngine {
    /// `replies` are `(move text in the player's frame, search score)`.
    pub fn new(start: Position, replies: &[(&str, i32)]) -> Self {
        Self {
            inner: XiangqiEngine::with_start(start),
            replies: replies
                .iter()
                .map(|&(text, score)| SearchReport::new(1, engine_move(text), score))
                .collect(),
        }
    }
}

impl Engine for ScriptedEngine {
    fn initial_position(&self) -> Position {
        self.inner.initial_position()
    }

    fn legal_moves(&self, position: &Position) -> Vec<Move> {
        self.inner.legal_moves(position)
    }

    fn apply_move(&self, position: &Position, mv: Move) -> Position {
        self.inner.apply_move(position, mv)
    }

    fn search<'a>(
        &'a mut self,
        _position: &Position,
        _history: &[Position],
    ) -> Box<dyn Iterator<Item = SearchReport> + 'a> {
        Box::new(self.replies.pop_front().into_iter())
    }
}

/// Factory for bundled engines that start from `start`.
pub fn factory_from(start: Position) -> EngineFactory {
    Arc::new(move || Box::new(XiangqiEngine::with_start(start.clone())) as Box<dyn Engine>)
}

/// The player's chariot on e1 can take the engine's general on e9.
pub fn mate_in_one() -> Position {
    layout([
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
    ])
}

/// The engine's chariot on e8 faces the player's general on e0; the player
/// has a spare soldier on a3.
pub fn exposed_general() -> Position {
    layout([
        "...k.....",
        "....r....",
        ".........",
        ".........",
        ".........",
        ".........",
        "P........",
        ".........",
        ".........",
        "....K....",
    ])
}

/// Sends one request to `app` and decodes the JSON reply.
pub async fn call(
    app: &axum::Router,
    uri: &str,
    session: Option<&str>,
    body: Option<serde_json::Value>,
) -> (axum::http::StatusCode, serde_json::Value) {
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    let mut request = axum::http::Request::builder().method("POST").uri(uri);
    if let Some(id) = session {
        request = request.header(strictly_xiangqi::SESSION_HEADER, id);
    }
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(axum::body::Body::from(json.to_string()))
            .unwrap(),
        None => request.body(axum::body::Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}
