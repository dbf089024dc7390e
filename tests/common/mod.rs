#![allow(dead_code)]

use axum::body::Body;
use futures_util::{SinkExt, StreamExt};
use http::{Method, Request};
use signageserver::db;
use signageserver::routes;
use signageserver::state::AppState;
use sqlx::SqlitePool;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Test server that owns an in-memory SQLite pool and full AppState.
/// Each instance is isolated, so tests can run in parallel.
pub struct TestServer {
    pub state: AppState,
}

impl TestServer {
    pub async fn new() -> Self {
        Self::with_peer_publish(false).await
    }

    pub async fn with_peer_publish(peer_publish: bool) -> Self {
        let pool = db::create_pool("sqlite::memory:")
            .await
            .expect("failed to create test pool");
        Self {
            state: AppState::new(pool, peer_publish),
        }
    }

    /// Returns an Axum Router wired to this server's state for `oneshot()` calls.
    pub fn router(&self) -> axum::Router {
        routes::router(self.state.clone())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.state.db
    }

    /// Binds a TCP listener on port 0, spawns the server, and returns the base URL.
    pub async fn spawn(&self) -> String {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("127.0.0.1:{}", addr.port())
    }

    pub async fn register_screen(&self, screen_id: &str) {
        db::screens::create_screen(self.pool(), screen_id)
            .await
            .expect("failed to register test screen");
    }

    pub async fn create_content(&self, screen_id: &str, data: &str) -> i64 {
        db::content::create_content(self.pool(), screen_id, data)
            .await
            .expect("failed to create test content")
            .id
    }

    /// Wait until the registry holds `screen_id`. Binding happens on the
    /// server task after the identify frame arrives.
    pub async fn wait_for_binding(&self, screen_id: &str) {
        for _ in 0..100 {
            if self.state.registry.lookup(screen_id).is_some() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("screen {screen_id} was never bound");
    }

    pub async fn wait_for_unbinding(&self, screen_id: &str) {
        for _ in 0..100 {
            if self.state.registry.lookup(screen_id).is_none() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("screen {screen_id} was never unbound");
    }
}

// ---------------------------------------------------------------------------
// Request builder helpers
// ---------------------------------------------------------------------------

pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Parse a response body into a `serde_json::Value`.
pub async fn parse_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// WebSocket helpers
// ---------------------------------------------------------------------------

/// Connect and consume the welcome frame.
pub async fn connect(addr: &str) -> Ws {
    let (mut ws, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    let welcome = next_json(&mut ws).await;
    assert_eq!(welcome["type"], "welcome");
    ws
}

/// Connect, identify as `screen_id`, and wait for the server to bind it.
pub async fn connect_as(server: &TestServer, addr: &str, screen_id: &str) -> Ws {
    let mut ws = connect(addr).await;
    send_json(
        &mut ws,
        serde_json::json!({ "type": "identify", "screenId": screen_id }),
    )
    .await;
    server.wait_for_binding(screen_id).await;
    ws
}

pub async fn send_json(ws: &mut Ws, value: serde_json::Value) {
    ws.send(Message::Text(value.to_string().into())).await.unwrap();
}

/// Next text frame as JSON, failing the test after two seconds.
pub async fn next_json(ws: &mut Ws) -> serde_json::Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

/// Assert nothing arrives within a short window.
pub async fn assert_silent(ws: &mut Ws) {
    let res = tokio::time::timeout(Duration::from_millis(200), ws.next()).await;
    assert!(res.is_err(), "expected no frame, got {res:?}");
}
