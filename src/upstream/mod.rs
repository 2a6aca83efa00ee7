//! Upstream host subsystem.
//!
//! # Data Flow
//! ```text
//! config.upstream.base_urls (fixed at startup)
//!     → hosts.rs HostPool
//!     → ordering(): pinned host first, rest in configured order
//!     → relay executor tries each in turn
//!     → pin(host) on success
//! ```
//!
//! # Design Decisions
//! - Host list is immutable; only the pin changes
//! - Pin is a hint, stored with an atomic swap and no locking
//! - No health tracking: every relay call walks the full ordering

pub mod hosts;

pub use hosts::{order_hosts, HostPool};
