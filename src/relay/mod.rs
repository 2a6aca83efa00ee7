//! Relay subsystem.
//!
//! # Data Flow
//! ```text
//! client JSON body
//!     → payload.rs (parse, presence/type checks)
//!     → records.rs / contacts.rs (validated operation)
//!     → failover.rs Relay::execute
//!         → HostPool::ordering()
//!         → per host: operation builds request → send → success predicate
//!         → success: pin host, return status/body verbatim
//!         → exhausted: RelayError::Exhausted with attempt records
//! ```
//!
//! # Design Decisions
//! - One executor for both operations; each supplies its own request
//!   builder and success predicate (exactly 200 vs any 2xx)
//! - Per-host failures are data (attempt records), not errors

pub mod attempt;
pub mod contacts;
pub mod error;
pub mod failover;
pub mod payload;
pub mod records;

use reqwest::{RequestBuilder, StatusCode};

pub use attempt::{AttemptOutcome, AttemptRecord};
pub use contacts::ContactListSubmit;
pub use error::{RelayError, RelayResult};
pub use failover::{Relay, UpstreamResponse};
pub use records::RecordFetch;

/// Header carrying the caller's upstream API key.
pub const API_KEY_HEADER: &str = "X-Sleekflow-Api-Key";

/// A proxied operation the failover executor can run.
pub trait RelayOperation: Send + Sync {
    /// Label for logs and metrics.
    fn name(&self) -> &'static str;

    /// Build the upstream request for one host.
    fn request(&self, client: &reqwest::Client, base_url: &str) -> Result<RequestBuilder, url::ParseError>;

    /// Whether an upstream status ends the failover loop.
    fn is_success(&self, status: StatusCode) -> bool;
}
