//! Failover executor.
//!
//! # State Machine
//! ```text
//! Idle → TryHost(0) → Success                     (pin host, return response)
//!                   → RecordFailure → TryHost(1) → ...
//!                                               → Exhausted (502 with attempts)
//! ```
//!
//! One attempt per host per relay call; no retries, no backoff.

use axum::body::Bytes;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::RelayConfig;
use crate::observability::metrics;
use crate::relay::attempt::{AttemptOutcome, AttemptRecord};
use crate::relay::error::{RelayError, RelayResult};
use crate::relay::RelayOperation;
use crate::upstream::HostPool;

/// The winning upstream response, relayed verbatim.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub base_url: String,
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Tries hosts from a [`HostPool`] until an operation succeeds.
#[derive(Debug, Clone)]
pub struct Relay {
    client: reqwest::Client,
    hosts: Arc<HostPool>,
}

impl Relay {
    /// Create a relay over an existing client and host pool.
    pub fn new(client: reqwest::Client, hosts: Arc<HostPool>) -> Self {
        Self { client, hosts }
    }

    /// Build the outbound client and host pool from configuration.
    pub fn from_config(config: &RelayConfig) -> RelayResult<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .timeout(Duration::from_secs(config.timeouts.attempt_secs));
        if !config.upstream.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        let hosts = Arc::new(HostPool::new(config.upstream.base_urls.clone()));
        Ok(Self::new(client, hosts))
    }

    /// The host pool, shared with every clone of this relay.
    pub fn hosts(&self) -> &Arc<HostPool> {
        &self.hosts
    }

    /// Run `op` against each host in order until one succeeds.
    pub async fn execute<O: RelayOperation>(&self, op: &O) -> RelayResult<UpstreamResponse> {
        let start = Instant::now();
        let operation = op.name();
        let order = self.hosts.ordering();
        let mut attempts = Vec::with_capacity(order.len());

        for (attempt, base_url) in order.into_iter().enumerate() {
            tracing::debug!(operation, attempt, base_url = %base_url, "Trying upstream host");

            match self.try_host(op, &base_url).await {
                Ok(response) => {
                    metrics::record_attempt(operation, "success");
                    metrics::record_relay(operation, "success", start);
                    tracing::info!(
                        operation,
                        attempt,
                        base_url = %base_url,
                        status = %response.status,
                        "Relay succeeded"
                    );
                    self.hosts.pin(&base_url);
                    return Ok(response);
                }
                Err(outcome) => {
                    metrics::record_attempt(operation, outcome.label());
                    match &outcome {
                        AttemptOutcome::Rejected { status, .. } => {
                            tracing::warn!(operation, attempt, base_url = %base_url, status, "Upstream rejected request, trying next host");
                        }
                        AttemptOutcome::Failed { error } => {
                            tracing::warn!(operation, attempt, base_url = %base_url, error = %error, "Upstream unreachable, trying next host");
                        }
                    }
                    attempts.push(AttemptRecord { base_url, outcome });
                }
            }
        }

        metrics::record_relay(operation, "exhausted", start);
        tracing::error!(operation, attempts = attempts.len(), "All upstream hosts failed");
        Err(RelayError::Exhausted { attempts })
    }

    async fn try_host<O: RelayOperation>(&self, op: &O, base_url: &str) -> Result<UpstreamResponse, AttemptOutcome> {
        let request = op.request(&self.client, base_url).map_err(|e| AttemptOutcome::Failed {
            error: format!("invalid upstream URL: {}", e),
        })?;

        let response = request.send().await.map_err(|e| AttemptOutcome::transport(&e))?;
        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response.bytes().await.map_err(|e| AttemptOutcome::transport(&e))?;

        if op.is_success(status) {
            Ok(UpstreamResponse {
                base_url: base_url.to_string(),
                status,
                content_type,
                body,
            })
        } else {
            Err(AttemptOutcome::Rejected {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::StatusCode as AxumStatus, Router};
    use reqwest::RequestBuilder;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::net::TcpListener;

    /// Minimal operation: GET `{base}/ping`, success on 200.
    struct Ping;

    impl RelayOperation for Ping {
        fn name(&self) -> &'static str {
            "ping"
        }

        fn request(&self, client: &reqwest::Client, base_url: &str) -> Result<RequestBuilder, url::ParseError> {
            Ok(client.get(url::Url::parse(base_url)?.join("ping")?))
        }

        fn is_success(&self, status: StatusCode) -> bool {
            status == StatusCode::OK
        }
    }

    /// Spawn an upstream answering every request with `status`/`body`.
    async fn upstream(status: u16, body: &'static str) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .fallback(move |State(hits): State<Arc<AtomicUsize>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                (AxumStatus::from_u16(status).unwrap(), body)
            })
            .with_state(hits.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (format!("http://{}", addr), hits)
    }

    /// A base URL nothing listens on.
    async fn dead_host() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    fn relay(hosts: Vec<String>) -> Relay {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        Relay::new(client, Arc::new(HostPool::new(hosts)))
    }

    #[tokio::test]
    async fn test_first_host_wins() {
        let (a, a_hits) = upstream(200, "a").await;
        let (b, b_hits) = upstream(200, "b").await;
        let relay = relay(vec![a.clone(), b]);

        let response = relay.execute(&Ping).await.unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(&response.body[..], b"a");
        assert_eq!(response.base_url, a);
        assert_eq!(a_hits.load(Ordering::SeqCst), 1);
        assert_eq!(b_hits.load(Ordering::SeqCst), 0);
        assert_eq!(relay.hosts().pinned().as_deref(), Some(&a));
    }

    #[tokio::test]
    async fn test_falls_through_to_third_host_and_pins_it() {
        let (a, a_hits) = upstream(503, "down").await;
        let (b, b_hits) = upstream(503, "down").await;
        let (c, _) = upstream(200, r#"{"records":[]}"#).await;
        let relay = relay(vec![a.clone(), b.clone(), c.clone()]);

        let response = relay.execute(&Ping).await.unwrap();
        assert_eq!(&response.body[..], br#"{"records":[]}"#);
        assert_eq!(relay.hosts().ordering(), vec![c.clone(), a.clone(), b.clone()]);

        // Pinned host is tried first next time; the failing hosts are skipped.
        relay.execute(&Ping).await.unwrap();
        assert_eq!(a_hits.load(Ordering::SeqCst), 1);
        assert_eq!(b_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_collects_every_attempt() {
        let (a, _) = upstream(500, "boom").await;
        let b = dead_host().await;
        let (c, _) = upstream(201, "created").await;
        let relay = relay(vec![a.clone(), b.clone(), c.clone()]);

        let err = relay.execute(&Ping).await.unwrap_err();
        let attempts = match err {
            RelayError::Exhausted { attempts } => attempts,
            other => panic!("expected exhaustion, got {:?}", other),
        };
        assert_eq!(attempts.len(), 3);
        assert_eq!(
            attempts[0],
            AttemptRecord {
                base_url: a,
                outcome: AttemptOutcome::Rejected { status: 500, body: "boom".into() },
            }
        );
        assert_eq!(attempts[1].base_url, b);
        assert!(matches!(attempts[1].outcome, AttemptOutcome::Failed { .. }));
        assert_eq!(attempts[2].outcome, AttemptOutcome::Rejected { status: 201, body: "created".into() });
        assert!(relay.hosts().pinned().is_none());
    }

    #[tokio::test]
    async fn test_invalid_base_url_recorded_as_attempt() {
        let (good, _) = upstream(200, "ok").await;
        let relay = relay(vec!["::not a url::".to_string(), good.clone()]);

        let response = relay.execute(&Ping).await.unwrap();
        assert_eq!(response.base_url, good);
    }

    #[tokio::test]
    async fn test_timeout_is_a_transport_failure() {
        let slow = Router::new().fallback(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        });
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let slow_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let _ = axum::serve(listener, slow).await;
        });
        let (fast, _) = upstream(200, "fast").await;

        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let relay = Relay::new(client, Arc::new(HostPool::new(vec![slow_url, fast.clone()])));

        let response = relay.execute(&Ping).await.unwrap();
        assert_eq!(response.base_url, fast);
    }
}
