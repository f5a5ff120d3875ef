//! Runtime configuration read from `SHOPCHECK_*` environment variables.
//!
//! CLI flags in `main.rs` override whatever the environment provides.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::consts::{
    DEFAULT_API_VERSION, DEFAULT_BIND_ADDR, DEFAULT_LOG_FILTER, DEFAULT_UPSTREAM_SCHEME,
    DEFAULT_UPSTREAM_TIMEOUT_SECS,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub log_filter: String,
    /// `https` in production; `http` lets tests point at a local stub.
    pub upstream_scheme: String,
    pub api_version: String,
    pub upstream_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid SHOPCHECK_BIND_ADDR '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("invalid SHOPCHECK_UPSTREAM_SCHEME '{0}': expected http or https")]
    InvalidScheme(String),
    #[error("invalid SHOPCHECK_UPSTREAM_TIMEOUT_SECS '{value}': {source}")]
    InvalidTimeout {
        value: String,
        source: std::num::ParseIntError,
    },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bind_addr_raw =
            read("SHOPCHECK_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr_raw
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_addr_raw,
                source,
            })?;

        let log_filter =
            read("SHOPCHECK_LOG_FILTER").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let upstream_scheme = read("SHOPCHECK_UPSTREAM_SCHEME")
            .map(|value| value.trim().to_ascii_lowercase())
            .unwrap_or_else(|| DEFAULT_UPSTREAM_SCHEME.to_string());
        validate_scheme(&upstream_scheme)?;

        let api_version =
            read("SHOPCHECK_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let upstream_timeout = match read("SHOPCHECK_UPSTREAM_TIMEOUT_SECS") {
            Some(value) => {
                let secs = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|source| ConfigError::InvalidTimeout { value, source })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        Ok(Self {
            bind_addr,
            log_filter,
            upstream_scheme,
            api_version,
            upstream_timeout,
        })
    }

    /// Plain-HTTP config with short timeouts, for driving local stubs.
    pub fn for_tests() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            log_filter: "debug".to_string(),
            upstream_scheme: "http".to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            upstream_timeout: Duration::from_secs(5),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8788))),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            upstream_scheme: DEFAULT_UPSTREAM_SCHEME.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

pub fn validate_scheme(scheme: &str) -> Result<(), ConfigError> {
    match scheme {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidScheme(other.to_string())),
    }
}
