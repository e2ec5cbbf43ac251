//! Background sweep of expired cache entries.
//!
//! The sweep only reclaims memory; reads already ignore stale entries.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::ContentCache;

/// Spawn a task that sweeps `cache` every `interval` until `cancel` fires.
///
/// # Panics
///
/// Panics if `interval` is zero.
pub fn spawn_janitor(
    cache: Arc<ContentCache>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    tokio::spawn(async move {
        // First tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Cache janitor shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = cache.sweep(Instant::now());
                    if removed > 0 {
                        debug!(removed, remaining = cache.len(), "Swept expired cache entries");
                    }
                }
            }
        }
    })
}

/// Owner handle for a running janitor.
///
/// Dropping the handle cancels the task.
pub struct JanitorHandle {
    cancel: CancellationToken,
    join: Option<JoinHandle<()>>,
}

impl JanitorHandle {
    /// Starts a janitor for `cache`.
    pub fn start(cache: Arc<ContentCache>, interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let join = spawn_janitor(cache, interval, cancel.clone());
        Self {
            cancel,
            join: Some(join),
        }
    }

    /// Returns true while the task is running.
    pub fn is_running(&self) -> bool {
        self.join.as_ref().is_some_and(|j| !j.is_finished())
    }

    /// Cancels the task and waits for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(join) = self.join.take() {
            if let Err(e) = join.await {
                if e.is_panic() {
                    warn!(error = %e, "Cache janitor panicked");
                }
            }
        }
    }
}

impl Drop for JanitorHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
