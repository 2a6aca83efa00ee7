//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the relay endpoints and static files
//! - Wire up middleware (CORS, panic recovery, tracing, request ID, body limit)
//! - Bind server to listener and shut down gracefully

use axum::{
    http::HeaderName,
    middleware,
    routing::post,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::handlers::{fetch_records, not_found, submit_contact_list};
use crate::http::middleware::cors::cors_middleware;
use crate::http::middleware::errors::{json_body_limit, panic_response};
use crate::http::static_files;
use crate::relay::{Relay, RelayResult};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
    relay: Arc<Relay>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> RelayResult<Self> {
        let relay = Arc::new(Relay::from_config(&config)?);
        Ok(Self::with_relay(config, relay))
    }

    /// Create a server around an already built relay.
    pub fn with_relay(config: RelayConfig, relay: Arc<Relay>) -> Self {
        let state = AppState { relay: relay.clone() };
        let router = Self::build_router(&config, state);
        Self { router, config, relay }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        // Other verbs on the relay paths get the same JSON 404 as unknown paths.
        let routes = Router::new()
            .route("/api/records", post(fetch_records).fallback(not_found))
            .route("/api/contact/list", post(submit_contact_list).fallback(not_found))
            .merge(static_files::router(&config.static_files))
            .with_state(state);

        Self::with_layers(routes, config)
    }

    /// Wrap `routes` in the middleware stack, innermost first.
    fn with_layers(routes: Router, config: &RelayConfig) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        routes
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(middleware::from_fn(json_body_limit))
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(middleware::from_fn(cors_middleware))
    }

    /// The fully layered router, for serving or driving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The relay shared by every handler.
    pub fn relay(&self) -> &Arc<Relay> {
        &self.relay
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream_hosts = self.relay.hosts().hosts().len(),
            static_root = %self.config.static_files.root,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
