//! Error types for the Selenium Grid exporter.

use std::time::Duration;

use thiserror::Error;

/// Errors raised while fetching the hub status.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid scrape URI {uri:?}: {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("unsupported URI scheme {0:?}: only http is supported")]
    UnsupportedScheme(String),

    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP exchange failed: {0}")]
    Http(String),

    #[error("request to {uri} timed out after {timeout:?}")]
    Timeout { uri: String, timeout: Duration },
}

/// The hub answered, but the body does not match the expected schema.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// Outcome of a failed scrape. Neither kind is fatal.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("can't scrape Selenium Grid: {0}")]
    FetchFailed(#[from] FetchError),

    #[error("can't decode Selenium Grid response: {0}")]
    DecodeFailed(#[from] DecodeError),
}

/// Invalid startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid listen address {addr:?}: {reason}")]
    InvalidListenAddress { addr: String, reason: String },

    #[error("invalid metrics path {0:?}: must start with '/'")]
    InvalidMetricsPath(String),

    #[error("unknown grid API {0:?} (expected one of: graphql, graphql-usage, hub-api)")]
    UnknownGridApi(String),
}
