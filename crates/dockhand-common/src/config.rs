//! Client configuration.
//!
//! Defaults come from the same environment variables the Docker CLI reads,
//! so a shell already pointed at a daemon works unchanged.

use std::time::Duration;

use once_cell::sync::Lazy;
use url::Url;

use crate::error::{DockhandError, DockhandResult};

/// Daemon address used when `DOCKER_HOST` is unset.
pub const DEFAULT_HOST: &str = "tcp://localhost:2375";

/// Request timeout used when `DOCKHAND_TIMEOUT` is unset.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Daemon address from the environment.
pub static DOCKER_HOST: Lazy<String> =
    Lazy::new(|| std::env::var("DOCKER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()));

/// Pinned API version from the environment, if any.
pub static DOCKER_API_VERSION: Lazy<Option<String>> = Lazy::new(|| {
    std::env::var("DOCKER_API_VERSION")
        .ok()
        .filter(|v| !v.is_empty())
});

/// Connection settings for a Docker daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Daemon address (`tcp://`, `http://` or `https://`).
    pub host: String,
    /// API version to pin requests to (e.g. `1.41`). Unversioned when `None`.
    pub api_version: Option<String>,
    /// Default per-request timeout.
    pub timeout: Duration,
    /// Use TLS for `tcp://` hosts.
    pub tls: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_version: None,
            timeout: DEFAULT_TIMEOUT,
            tls: false,
        }
    }
}

impl ClientConfig {
    /// Create a configuration from `DOCKER_HOST`, `DOCKER_API_VERSION`,
    /// `DOCKER_TLS_VERIFY` and `DOCKHAND_TIMEOUT`.
    #[must_use]
    pub fn from_env() -> Self {
        let timeout = std::env::var("DOCKHAND_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

        Self {
            host: (*DOCKER_HOST).clone(),
            api_version: (*DOCKER_API_VERSION).clone(),
            timeout,
            tls: std::env::var("DOCKER_TLS_VERIFY").is_ok_and(|v| !v.is_empty() && v != "0"),
        }
    }

    /// Set the daemon address.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Pin the API version.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set the default request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use TLS for `tcp://` hosts.
    #[must_use]
    pub const fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    /// Resolve the daemon address to an HTTP base URL.
    ///
    /// # Errors
    ///
    /// Returns [`DockhandError::Config`] for socket transports (`unix://`,
    /// `npipe://`) and unparsable addresses.
    pub fn base_url(&self) -> DockhandResult<Url> {
        let host = self.host.trim();
        let scheme = if self.tls { "https" } else { "http" };

        let normalized = match host.split_once("://") {
            Some(("tcp", rest)) => format!("{scheme}://{rest}"),
            Some(("http" | "https", _)) => host.to_string(),
            Some((other, _)) => {
                return Err(DockhandError::Config {
                    message: format!(
                        "unsupported daemon scheme '{other}://' (expose the daemon over tcp://)"
                    ),
                });
            }
            None => format!("{scheme}://{host}"),
        };

        let url = Url::parse(&normalized).map_err(|e| DockhandError::Config {
            message: format!("invalid daemon address '{host}': {e}"),
        })?;

        if url.host_str().is_none() {
            return Err(DockhandError::Config {
                message: format!("daemon address '{host}' has no host"),
            });
        }

        Ok(url)
    }

    /// Path prefix for versioned endpoints (`/v1.41`), or empty.
    #[must_use]
    pub fn version_prefix(&self) -> String {
        self.api_version
            .as_deref()
            .map(|v| format!("/v{}", v.trim_start_matches('v')))
            .unwrap_or_default()
    }
}
