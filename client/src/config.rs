//! Controller configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_REVEAL_DELAY_MS: u64 = 800;
pub const DEFAULT_ROUND_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Pause between receiving a round result and applying it.
    pub reveal_delay: Duration,
    /// Upper bound on the `/play` call. `None` waits forever.
    pub round_timeout: Option<Duration>,
    /// Per-request timeout for the HTTP backend. `None` disables it.
    pub http_timeout: Option<Duration>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(DEFAULT_REVEAL_DELAY_MS),
            round_timeout: Some(Duration::from_secs(DEFAULT_ROUND_TIMEOUT_SECS)),
            http_timeout: Some(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)),
        }
    }
}

impl ControllerConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `RPS_REVEAL_DELAY_MS`: default 800
    /// - `RPS_ROUND_TIMEOUT_SECS`: default 10, `0` disables
    /// - `RPS_HTTP_TIMEOUT_SECS`: default 10, `0` disables
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            reveal_delay: Duration::from_millis(env_parse_u64("RPS_REVEAL_DELAY_MS", DEFAULT_REVEAL_DELAY_MS)),
            round_timeout: timeout_from_secs(env_parse_u64("RPS_ROUND_TIMEOUT_SECS", DEFAULT_ROUND_TIMEOUT_SECS)),
            http_timeout: timeout_from_secs(env_parse_u64("RPS_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)),
        }
    }

    #[must_use]
    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    #[must_use]
    pub fn with_round_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.round_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_http_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.http_timeout = timeout;
        self
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Zero seconds means "no timeout".
pub(crate) fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
