//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → middleware/cors.rs (OPTIONS short-circuit, CORS headers on everything)
//!     → handlers.rs (POST /api/records, POST /api/contact/list)
//!         → relay::Relay (failover across upstream hosts)
//!     → static_files.rs (GET /*, JSON 404 otherwise)
//!     → response.rs (verbatim upstream response or JSON error)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod static_files;

pub use server::{AppState, HttpServer, X_REQUEST_ID};
