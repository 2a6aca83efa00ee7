//! Reading relay configuration from TOML.
//!
//! `load_config` is the strict entry point (parse and validate).
//! `resolve_config` is what the binary uses: it applies the CLI port
//! override before validating, so an override can repair a bad address.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Why a relay configuration could not be produced.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid relay config: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

fn read_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Parse and validate the relay config at `path`.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Effective config for the binary: the file (or built-in hosts and
/// defaults), then the port override, validated once at the end.
pub fn resolve_config(path: Option<&Path>, port: Option<u16>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => RelayConfig::default(),
    };

    if let Some(port) = port {
        config.listener.set_port(port);
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
