//! Failover relay library.
//!
//! Forwards record fetches and contact-list submissions to a fixed list of
//! redundant upstream API hosts, falling back through the list until one
//! succeeds and preferring the host that succeeded last.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod upstream;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::Relay;
