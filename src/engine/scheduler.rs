//! Tick scheduler
//!
//! Runs a tick callback on a fixed period in a background task. The callback
//! is awaited to completion before the next period is considered, so ticks
//! never overlap.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Recurring timer that owns its background task
#[derive(Debug)]
pub struct Scheduler {
    period: Duration,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
    /// Create a stopped scheduler
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: Mutex::new(None),
        }
    }

    /// Tick period
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Spawn the tick task
    ///
    /// The first tick fires one period after start. The task ends on its own
    /// when `tick` returns `false`. Returns `false` without spawning if
    /// already running or if called outside a Tokio runtime.
    pub fn start<F, Fut>(&self, mut tick: F) -> bool
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let mut handle = self.lock();
        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            tracing::debug!("Scheduler already running");
            return false;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot start scheduler outside a Tokio runtime");
                return false;
            }
        };

        let period = self.period;
        let first = Instant::now() + period;
        *handle = Some(runtime.spawn(async move {
            let mut ticker = tokio::time::interval_at(first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if !tick().await {
                    break;
                }
            }
        }));

        tracing::info!(period_ms = period.as_millis() as u64, "Scheduler started");
        true
    }

    /// Abort the tick task
    ///
    /// Returns `false` if it was not running.
    pub fn stop(&self) -> bool {
        match self.lock().take() {
            Some(handle) => {
                handle.abort();
                tracing::info!("Scheduler stopped");
                true
            }
            None => false,
        }
    }

    /// Whether the tick task is alive
    pub fn is_running(&self) -> bool {
        self.lock().as_ref().is_some_and(|h| !h.is_finished())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.lock().take() {
            handle.abort();
        }
    }
}
