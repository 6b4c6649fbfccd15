//! Configuration for the monitor and the web server.
//!
//! Server settings load from environment variables with sensible defaults;
//! target URLs come from the command line and are validated here, before the
//! monitor is built. The monitoring core itself never re-validates them.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::stats::StatsMap;

/// Callback invoked with the live stats map whenever a poll completes (and
/// once more on shutdown). Runs on the monitor's dispatch loop, so it must
/// not block indefinitely.
pub type Renderer = Arc<dyn Fn(&StatsMap) + Send + Sync>;

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no target URLs given")]
    MissingTargets,
    #[error("invalid target URL {0:?}: {1}")]
    InvalidTarget(String, String),
    #[error("unsupported scheme {1:?} in target {0:?}")]
    InvalidScheme(String, String),
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port for the stats endpoint (default: 8080)
    pub http_port: u16,
    /// Period between poll ticks (default: 5s)
    pub tick_period: Duration,
    /// Per-request timeout for the shared HTTP client (default: 10s)
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            tick_period: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `WEBMON_HTTP_PORT`: HTTP port (default: 8080)
    /// - `WEBMON_TICK_SECS`: tick period in seconds (default: 5)
    /// - `WEBMON_TIMEOUT_SECS`: client timeout in seconds (default: 10)
    pub fn load() -> Self {
        let mut cfg = Self::default();

        if let Ok(port_str) = env::var("WEBMON_HTTP_PORT") {
            if let Ok(port) = port_str.parse() {
                cfg.http_port = port;
            }
        }

        if let Ok(secs_str) = env::var("WEBMON_TICK_SECS") {
            if let Ok(secs) = secs_str.parse::<u64>() {
                if secs > 0 {
                    cfg.tick_period = Duration::from_secs(secs);
                }
            }
        }

        if let Ok(secs_str) = env::var("WEBMON_TIMEOUT_SECS") {
            if let Ok(secs) = secs_str.parse::<u64>() {
                if secs > 0 {
                    cfg.request_timeout = Duration::from_secs(secs);
                }
            }
        }

        cfg
    }
}

/// Everything the monitor needs: the target set, a shared pre-configured
/// HTTP client (timeout policy included), the tick period, and the render
/// callback.
#[derive(Clone)]
pub struct MonitorConfig {
    pub targets: Vec<String>,
    pub client: reqwest::Client,
    pub tick_period: Duration,
    pub renderer: Renderer,
}

/// Validate the target list: non-empty, each an absolute http(s) URL.
pub fn validate_targets(targets: &[String]) -> Result<(), ConfigError> {
    if targets.is_empty() {
        return Err(ConfigError::MissingTargets);
    }

    for target in targets {
        let parsed = reqwest::Url::parse(target)
            .map_err(|e| ConfigError::InvalidTarget(target.clone(), e.to_string()))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::InvalidScheme(
                target.clone(),
                parsed.scheme().to_string(),
            ));
        }
    }

    Ok(())
}
