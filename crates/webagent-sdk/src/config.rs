//! Backend connection configuration.
//!
//! Built once at startup from environment variables, then optionally
//! overridden by command-line flags before the [`BackendClient`] is
//! constructed.
//!
//! [`BackendClient`]: crate::BackendClient

use std::time::Duration;

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Default delay between two health probes.
pub const DEFAULT_HEALTH_INTERVAL: Duration = Duration::from_secs(10);
/// Default per-request timeout.  Shopping queries take 25-35 s on the
/// backend, so this leaves generous headroom.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Everything needed to talk to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base address of the backend (e.g. `http://localhost:8000`).
    pub base_url: String,
    /// Delay between two `GET /health` probes.
    pub health_interval: Duration,
    /// Per-request timeout.  `None` waits forever.
    pub request_timeout: Option<Duration>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            health_interval: DEFAULT_HEALTH_INTERVAL,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

impl BackendConfig {
    /// Build the configuration from environment variables.
    ///
    /// | Variable                         | Default                 | Description                        |
    /// |----------------------------------|-------------------------|------------------------------------|
    /// | `WEBAGENT_API_URL`               | `http://localhost:8000` | Backend base address               |
    /// | `WEBAGENT_HEALTH_INTERVAL_SECS`  | `10`                    | Seconds between health probes      |
    /// | `WEBAGENT_REQUEST_TIMEOUT_SECS`  | `120`                   | Per-request timeout, `0` disables  |
    ///
    /// Unparsable numbers fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let base_url = lookup("WEBAGENT_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.base_url);

        let health_interval = lookup("WEBAGENT_HEALTH_INTERVAL_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(defaults.health_interval, Duration::from_secs);

        let request_timeout = match lookup("WEBAGENT_REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.request_timeout,
        };

        Self {
            base_url,
            health_interval,
            request_timeout,
        }
    }
}
