//! Upstream host pool.
//!
//! # Responsibilities
//! - Hold the fixed, ordered list of upstream base URLs
//! - Track the pinned host (last host that served a successful relay)
//! - Produce the attempt order for the next relay call

use arc_swap::ArcSwapOption;
use std::sync::Arc;

use crate::observability::metrics;

/// The fixed upstream host list plus the pinned-host hint.
///
/// The pin is a lock-free single slot. Concurrent successful relays race on
/// it and the last writer wins; the value only influences ordering.
#[derive(Debug)]
pub struct HostPool {
    hosts: Vec<String>,
    pinned: ArcSwapOption<String>,
}

impl HostPool {
    /// Create a pool with nothing pinned.
    pub fn new(hosts: Vec<String>) -> Self {
        Self {
            hosts,
            pinned: ArcSwapOption::empty(),
        }
    }

    /// The configured hosts in their original order.
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// The currently pinned host, if any.
    pub fn pinned(&self) -> Option<Arc<String>> {
        self.pinned.load_full()
    }

    /// Hosts to try for the next relay call.
    pub fn ordering(&self) -> Vec<String> {
        let pinned = self.pinned.load();
        order_hosts(&self.hosts, pinned.as_deref().map(String::as_str))
    }

    /// Record `host` as the most recently successful upstream.
    pub fn pin(&self, host: &str) {
        let previous = self.pinned.swap(Some(Arc::new(host.to_string())));
        let previous = previous.as_deref().map(String::as_str);
        if previous != Some(host) {
            tracing::info!(
                previous = previous.unwrap_or("none"),
                base_url = %host,
                "Pinned upstream host changed"
            );
            metrics::record_pin_change(host);
        }
    }
}

/// Pinned host first, then every other host in configured order.
///
/// A pin that is not part of `hosts` is ignored.
pub fn order_hosts(hosts: &[String], pinned: Option<&str>) -> Vec<String> {
    let pinned = pinned.filter(|p| hosts.iter().any(|h| h == p));
    match pinned {
        Some(pinned) => std::iter::once(pinned.to_string())
            .chain(hosts.iter().filter(|h| h.as_str() != pinned).cloned())
            .collect(),
        None => hosts.to_vec(),
    }
}
