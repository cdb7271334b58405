//! Test fixtures for integration tests.
//!
//! Starts the server in-process on an ephemeral port and provides a small
//! WebSocket client speaking the `{"event", "data"}` protocol.

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use agora_server::{ServerConfig, ui::state::AppState};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::{net::TcpListener, net::TcpStream, sync::oneshot, time::timeout};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message,
};

/// How long to wait for a frame that is expected to arrive
pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);
/// How long to wait before concluding that no frame arrives
pub const SILENCE: Duration = Duration::from_millis(300);

/// Running test server; shut down on drop
pub struct TestServer {
    addr: std::net::SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Start a server with default configuration
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let state = Arc::new(AppState::new(&config));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            agora_server::ui::serve(listener, state, async {
                let _ = shutdown_rx.await;
            })
            .await
            .ok();
        });

        Self {
            addr,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Open a WebSocket connection
    pub async fn connect(&self) -> TestClient {
        let (stream, _) = connect_async(self.ws_url())
            .await
            .expect("Failed to connect WebSocket");
        TestClient { stream }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// WebSocket client for tests
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn emit(&mut self, event: Value) {
        self.stream
            .send(Message::Text(event.to_string().into()))
            .await
            .expect("Failed to send frame");
    }

    pub async fn join(&mut self, room: &str) {
        self.emit(serde_json::json!({"event": "join_room", "data": room}))
            .await;
    }

    /// Next server event, failing the test after `RECV_TIMEOUT`
    pub async fn recv(&mut self) -> Value {
        self.try_recv(RECV_TIMEOUT)
            .await
            .expect("Timed out waiting for a server event")
    }

    /// Next server event, or `None` if nothing arrives within `wait`
    pub async fn try_recv(&mut self, wait: Duration) -> Option<Value> {
        loop {
            let frame = timeout(wait, self.stream.next()).await.ok()??;
            match frame.expect("WebSocket error") {
                Message::Text(text) => {
                    return Some(serde_json::from_str(text.as_str()).expect("Invalid JSON frame"));
                }
                Message::Close(_) => return None,
                _ => continue,
            }
        }
    }

    /// Assert that no event arrives within `SILENCE`
    pub async fn expect_silence(&mut self) {
        if let Some(event) = self.try_recv(SILENCE).await {
            panic!("Unexpected event: {event}");
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

/// Wait until the server has processed previously sent frames
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}
