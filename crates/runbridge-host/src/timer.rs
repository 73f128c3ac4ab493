//! Repeating timer that retains its target, like a run-loop timer or display link.
//!
//! The timer owns an `Arc<dyn Responder>` for as long as it is scheduled.
//! Hand it a [`runbridge_core::proxy::WeakProxy`] when the real target should
//! stay free to drop.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use runbridge_core::proxy::Responder;
use serde_json::json;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub struct RepeatingTimer {
    op: String,
    fired: Arc<AtomicU64>,
    invalidated: AtomicBool,
    task: JoinHandle<()>,
}

impl RepeatingTimer {
    /// Starts firing `op` on `target` every `interval`, first after one
    /// interval. Each fire passes the 1-based fire count as the only argument.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(interval: Duration, target: Arc<dyn Responder>, op: impl Into<String>) -> Self {
        let op = op.into();
        let fired = Arc::new(AtomicU64::new(0));

        let task = tokio::spawn({
            let op = op.clone();
            let fired = Arc::clone(&fired);
            async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                // The first tick completes immediately.
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    let n = fired.fetch_add(1, Ordering::Relaxed) + 1;
                    match target.perform(&op, &[json!(n)]) {
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::debug!(op = %op, fire = n, error = %e, "timer target rejected fire")
                        }
                        None => {
                            tracing::debug!(op = %op, fire = n, "timer target does not respond")
                        }
                    }
                }
            }
        });

        tracing::debug!(op = %op, ?interval, "repeating timer scheduled");
        Self {
            op,
            fired,
            invalidated: AtomicBool::new(false),
            task,
        }
    }

    pub fn operation(&self) -> &str {
        &self.op
    }

    pub fn fire_count(&self) -> u64 {
        self.fired.load(Ordering::Relaxed)
    }

    /// False as soon as `invalidate` is called, even before the runtime has
    /// torn the task down.
    pub fn is_valid(&self) -> bool {
        !self.invalidated.load(Ordering::Acquire) && !self.task.is_finished()
    }

    /// Stops firing. The target is released once the runtime drops the task.
    pub fn invalidate(&self) {
        if !self.invalidated.swap(true, Ordering::AcqRel) {
            tracing::debug!(op = %self.op, fired = self.fire_count(), "repeating timer invalidated");
        }
        self.task.abort();
    }
}

impl Drop for RepeatingTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
