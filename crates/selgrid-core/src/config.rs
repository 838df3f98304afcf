//! Exporter configuration.
//!
//! Built once at startup from command-line flags and handed to the
//! fetcher, collector and HTTP server by value.

use std::net::{SocketAddr, ToSocketAddrs};

use crate::error::ConfigError;
use crate::grid::GridApi;

pub const DEFAULT_LISTEN_ADDRESS: &str = ":8080";
pub const DEFAULT_METRICS_PATH: &str = "/metrics";
pub const DEFAULT_SCRAPE_URI: &str = "http://grid.local";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterConfig {
    /// Address the metrics server binds to.
    pub listen_address: SocketAddr,
    /// Path under which metrics are exposed.
    pub metrics_path: String,
    /// Base URI of the Selenium Grid hub.
    pub scrape_uri: String,
    /// Which hub API to query.
    pub grid_api: GridApi,
}

impl ExporterConfig {
    /// Validate raw flag values into a config.
    pub fn new(
        listen_address: &str,
        metrics_path: &str,
        scrape_uri: &str,
        grid_api: GridApi,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            listen_address: parse_listen_address(listen_address)?,
            metrics_path: validate_metrics_path(metrics_path)?,
            scrape_uri: scrape_uri.trim().to_string(),
            grid_api,
        })
    }
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            listen_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            metrics_path: DEFAULT_METRICS_PATH.to_string(),
            scrape_uri: DEFAULT_SCRAPE_URI.to_string(),
            grid_api: GridApi::default(),
        }
    }
}

/// Parse a listen address.
///
/// Accepts `:port` (all IPv4 interfaces, `0.0.0.0`), `ip:port`,
/// `[ipv6]:port` and `hostname:port`. Use `[::]:port` to listen on IPv6.
/// Hostnames are resolved and the first address wins.
pub fn parse_listen_address(addr: &str) -> Result<SocketAddr, ConfigError> {
    let addr = addr.trim();
    let invalid = |reason: String| ConfigError::InvalidListenAddress {
        addr: addr.to_string(),
        reason,
    };

    if let Some(port) = addr.strip_prefix(':') {
        let port: u16 = port.parse().map_err(|e| invalid(format!("bad port: {e}")))?;
        return Ok(SocketAddr::from(([0, 0, 0, 0], port)));
    }

    if let Ok(sock) = addr.parse::<SocketAddr>() {
        return Ok(sock);
    }

    addr.to_socket_addrs()
        .map_err(|e| invalid(e.to_string()))?
        .next()
        .ok_or_else(|| invalid("resolved to no addresses".to_string()))
}

/// Metrics paths must be absolute and literal.
///
/// Router syntax (`{capture}`, `*wildcard`, `:segment`) is rejected so the
/// path matches exactly one route.
pub fn validate_metrics_path(path: &str) -> Result<String, ConfigError> {
    let path = path.trim();
    let literal = !path.contains(['{', '}', '*'])
        && !path.split('/').any(|segment| segment.starts_with(':'));

    if !path.starts_with('/') || path.contains(char::is_whitespace) || !literal {
        return Err(ConfigError::InvalidMetricsPath(path.to_string()));
    }
    Ok(path.to_string())
}
