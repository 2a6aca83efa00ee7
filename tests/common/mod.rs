//! Shared utilities for integration testing.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    Router,
};
use failover_relay::config::RelayConfig;
use failover_relay::{HttpServer, Shutdown};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// A request as seen by a mock upstream.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Handle on a running mock upstream.
#[derive(Clone)]
pub struct MockUpstream {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl MockUpstream {
    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<Captured>>>,
    status: u16,
    body: &'static str,
}

async fn respond(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, [(&'static str, &'static str); 1], &'static str) {
    state.requests.lock().unwrap().push(Captured {
        method,
        uri,
        headers,
        body,
    });
    (
        StatusCode::from_u16(state.status).unwrap(),
        [("content-type", "application/json")],
        state.body,
    )
}

/// Start a mock upstream answering every request with a fixed status and body.
pub async fn start_upstream(status: u16, body: &'static str) -> MockUpstream {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().fallback(respond).with_state(MockState {
        requests: requests.clone(),
        status,
        body,
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream {
        base_url: format!("http://{}", addr),
        requests,
    }
}

/// A base URL with nothing listening behind it.
pub async fn dead_upstream() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Relay config pointed at `base_urls`, with short timeouts and no proxies.
pub fn relay_config(base_urls: Vec<String>) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.base_urls = base_urls;
    config.upstream.use_system_proxy = false;
    config.timeouts.connect_secs = 2;
    config.timeouts.attempt_secs = 5;
    config
}

/// Start the relay on an ephemeral port. Returns its address and the
/// shutdown handle that stops it.
pub async fn start_relay(config: RelayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

/// Client that never routes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
