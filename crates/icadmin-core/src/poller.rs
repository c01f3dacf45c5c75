//! Bounded wait for a cluster topology to converge.

use std::future::Future;
use std::time::Duration;

use crate::config::ConvergenceSettings;
use crate::error::Result;
use crate::types::TopologyView;

/// Result of a poll. Running out of attempts is not an error.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    /// The last fetched snapshot.
    pub view: TopologyView,
    pub converged: bool,
    /// Number of fetches performed.
    pub attempts: u32,
}

#[derive(Debug, Clone)]
pub struct ConvergencePoller {
    max_attempts: u32,
    interval: Duration,
}

impl Default for ConvergencePoller {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(1))
    }
}

impl ConvergencePoller {
    /// `max_attempts` is clamped to at least one fetch.
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
        }
    }

    pub fn from_settings(settings: &ConvergenceSettings) -> Self {
        Self::new(settings.max_attempts, settings.interval())
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Fetch and test until `converged` holds or attempts run out.
    /// Sleeps `interval` between failed attempts, never after the last one.
    /// A fetch error ends the poll and is returned as is.
    pub async fn poll<F, Fut, P>(&self, mut fetch: F, converged: P) -> Result<PollOutcome>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<TopologyView>>,
        P: Fn(&TopologyView) -> bool,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let view = fetch().await?;
            if converged(&view) {
                return Ok(PollOutcome {
                    view,
                    converged: true,
                    attempts: attempt,
                });
            }
            tracing::debug!(attempt, max = self.max_attempts, "Cluster not converged yet");
            if attempt >= self.max_attempts {
                return Ok(PollOutcome {
                    view,
                    converged: false,
                    attempts: attempt,
                });
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}

/// Convergence when the primary member reports ONLINE.
pub fn primary_online(view: &TopologyView) -> bool {
    view.primary_online()
}

/// Convergence when every member reports ONLINE.
pub fn all_online(view: &TopologyView) -> bool {
    view.all_online()
}
