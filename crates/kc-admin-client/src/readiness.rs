//! Readiness gate for a starting backend.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::config::AdminConfig;
use crate::error::{AdminError, AdminResult};
use crate::session::deadline_after;

/// Timeout of a single probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Polls a URL until it answers with a success status.
///
/// Every failure while polling, including refused connections and non-2xx
/// answers, only means "not ready yet".
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    http: reqwest::Client,
    interval: Duration,
}

impl ReadinessGate {
    /// Creates a gate polling at `interval`.
    pub fn new(interval: Duration) -> AdminResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()?;
        Ok(Self { http, interval })
    }

    /// Creates a gate using the configured poll interval.
    pub fn from_config(config: &AdminConfig) -> AdminResult<Self> {
        Self::new(config.poll_interval())
    }

    /// Waits until `url` answers successfully.
    ///
    /// Returns the number of probes made. Fails with [`AdminError::Timeout`]
    /// once `timeout` has elapsed without a success.
    pub async fn wait_until_ready(&self, url: &str, timeout: Duration) -> AdminResult<u32> {
        let started = Instant::now();
        let deadline = deadline_after(started, timeout);
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match self.http.get(url).send().await {
                Ok(response) if response.status().is_success() => {
                    info!(%url, attempts = attempt, elapsed = ?started.elapsed(), "backend ready");
                    return Ok(attempt);
                }
                Ok(response) => {
                    debug!(%url, status = %response.status(), attempt, "backend not ready");
                }
                Err(e) => {
                    debug!(%url, error = %e, attempt, "backend not ready");
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(AdminError::Timeout {
                    url: url.to_string(),
                    waited: now - started,
                });
            }
            sleep(self.interval.min(deadline - now)).await;
        }
    }
}
