//! The watch/poll state machine.
//!
//! One logical timer per configuration instance. `start_watch` replaces any
//! pending timer task (never two outstanding); `end_watch` is cooperative —
//! it prevents future scheduling but lets an in-flight fire complete its
//! pass, so cessation is guaranteed within one interval.

use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use strata_events::{ConfigEvent, EventMetadata};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::ConfigClient;

/// Poll interval used when `start_watch` is called without one.
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(30);

/// Watch state owned by one [`ConfigClient`].
///
/// The timer task handle is exclusively owned here and replaced, never
/// aliased, on each restart.
#[derive(Debug)]
pub(crate) struct WatchState {
    interval: Duration,
    /// Active flag for the current watch generation. Retired (set to false)
    /// when the watch is stopped or restarted.
    active: Option<Arc<AtomicBool>>,
    handle: Option<JoinHandle<()>>,
}

impl Default for WatchState {
    fn default() -> Self {
        Self {
            interval: DEFAULT_WATCH_INTERVAL,
            active: None,
            handle: None,
        }
    }
}

impl ConfigClient {
    /// Start (or restart) periodic re-resolution.
    ///
    /// Sets the poll interval when one is given, otherwise keeps the current
    /// one. Any pending timer is cancelled before the new one is installed,
    /// so exactly one timer is outstanding at a time. Each firing runs one
    /// resolution pass and publishes a [`ConfigEvent::Refreshed`] or
    /// [`ConfigEvent::Failed`]; the next firing is only scheduled after the
    /// pass completes, so passes never overlap.
    pub fn start_watch(&self, interval: Option<Duration>) {
        let mut watch = self
            .inner
            .watch
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(interval) = interval {
            watch.interval = interval;
        }

        // Retire the previous generation before installing the new timer.
        if let Some(flag) = watch.active.take() {
            flag.store(false, Ordering::SeqCst);
        }
        if let Some(handle) = watch.handle.take() {
            handle.abort();
        }

        let flag = Arc::new(AtomicBool::new(true));
        watch.active = Some(Arc::clone(&flag));

        let interval = watch.interval;
        let client = self.clone();
        debug!(interval_ms = interval.as_millis() as u64, "watch started");
        watch.handle = Some(tokio::spawn(async move {
            client.watch_loop(interval, flag).await;
        }));
    }

    /// Stop periodic re-resolution.
    ///
    /// Cooperative: an already-scheduled firing still completes its pass and
    /// then observes the cleared flag instead of rescheduling.
    pub fn end_watch(&self) {
        let mut watch = self
            .inner
            .watch
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(flag) = watch.active.take() {
            flag.store(false, Ordering::SeqCst);
            debug!("watch stopping");
        }
        // The handle is left in place; the loop exits on its own.
    }

    /// Whether a watch is currently marked active.
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.inner
            .watch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .active
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    async fn watch_loop(self, interval: Duration, active: Arc<AtomicBool>) {
        loop {
            tokio::time::sleep(interval).await;

            match self.inner.resolver.resolve().await {
                Ok(composed) => {
                    let composed = Arc::new(composed);
                    self.store(Arc::clone(&composed));
                    self.inner.events.publish(ConfigEvent::Refreshed {
                        metadata: EventMetadata::new("watcher"),
                        config: (*composed).clone(),
                    });
                },
                Err(err) => {
                    warn!(error = %err, "watch pass failed");
                    self.inner.events.publish(ConfigEvent::Failed {
                        metadata: EventMetadata::new("watcher"),
                        error: err.to_string(),
                    });
                },
            }

            if !active.load(Ordering::SeqCst) {
                debug!("watch stopped");
                return;
            }
        }
    }
}
