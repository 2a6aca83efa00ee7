//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics. Every problem is
//! reported, not just the first one.

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting all errors.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.upstream.base_urls.is_empty() {
        errors.push(ValidationError::new(
            "upstream.base_urls",
            "at least one base URL is required",
        ));
    }

    let mut seen = HashSet::new();
    for (i, base_url) in config.upstream.base_urls.iter().enumerate() {
        let field = format!("upstream.base_urls[{}]", i);
        match Url::parse(base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                if url.cannot_be_a_base() || url.host().is_none() {
                    errors.push(ValidationError::new(field.clone(), "URL has no host"));
                }
            }
            Ok(url) => {
                errors.push(ValidationError::new(
                    field.clone(),
                    format!("unsupported scheme '{}'", url.scheme()),
                ));
            }
            Err(e) => {
                errors.push(ValidationError::new(field.clone(), format!("invalid URL: {}", e)));
            }
        }
        if !seen.insert(base_url.as_str()) {
            errors.push(ValidationError::new(field, format!("duplicate base URL '{}'", base_url)));
        }
    }

    if config.timeouts.attempt_secs == 0 {
        errors.push(ValidationError::new("timeouts.attempt_secs", "must be greater than 0"));
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be greater than 0"));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
