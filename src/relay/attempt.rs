//! Per-host attempt records reported when a relay exhausts its hosts.

use serde::Serialize;
use std::error::Error as StdError;

/// One failed host attempt.
///
/// Serializes as `{"baseUrl", "status", "body"}` for an upstream rejection or
/// `{"baseUrl", "error"}` for a transport failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub base_url: String,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

/// Why a host attempt did not end the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttemptOutcome {
    /// Upstream answered with a status the operation does not accept.
    Rejected { status: u16, body: String },
    /// No usable response (connect, DNS, timeout, body read).
    Failed { error: String },
}

impl AttemptOutcome {
    /// Transport failure from a reqwest error, including its source chain.
    pub fn transport(err: &reqwest::Error) -> Self {
        let mut error = err.to_string();
        if err.is_timeout() && !error.contains("timed out") {
            error.push_str(": timed out");
        }
        let mut source = err.source();
        while let Some(cause) = source {
            error.push_str(": ");
            error.push_str(&cause.to_string());
            source = cause.source();
        }
        AttemptOutcome::Failed { error }
    }

    /// Short label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            AttemptOutcome::Rejected { .. } => "rejected",
            AttemptOutcome::Failed { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejected_shape() {
        let record = AttemptRecord {
            base_url: "http://a.example".into(),
            outcome: AttemptOutcome::Rejected {
                status: 503,
                body: "busy".into(),
            },
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"baseUrl": "http://a.example", "status": 503, "body": "busy"})
        );
    }

    #[test]
    fn test_failed_shape() {
        let record = AttemptRecord {
            base_url: "http://b.example".into(),
            outcome: AttemptOutcome::Failed {
                error: "connection refused".into(),
            },
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"baseUrl": "http://b.example", "error": "connection refused"})
        );
        assert_eq!(record.outcome.label(), "error");
    }
}
