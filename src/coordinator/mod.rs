//! Shared refresh coordinator.
//!
//! One coordinator per configured locale owns the refresh period, the only
//! fetch in flight and the cached payload that every sensor reads.

mod state;

pub use state::{CacheState, RefreshFailure};

use std::sync::{Arc, Weak};
use std::time::{Duration, SystemTime};

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::api::{FailureKind, FetchError, Locale, MedalPayload, MedalsClient};
use crate::shutdown::ShutdownHandle;

const EVENT_BUFFER: usize = 16;

/// Notification sent to observers after every refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinatorEvent {
    /// A new payload replaced the cache.
    Updated { generation: u64 },
    /// The refresh failed; the previous payload is still cached.
    UpdateFailed { kind: FailureKind, message: String },
}

#[derive(Clone)]
pub struct MedalCoordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    locale: Locale,
    client: MedalsClient,
    update_interval: Duration,
    cache: RwLock<CacheState>,
    events: broadcast::Sender<CoordinatorEvent>,
    /// Serialises refreshes so stores happen in issue order.
    refresh_lock: tokio::sync::Mutex<()>,
    shutdown: ShutdownHandle,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl MedalCoordinator {
    pub fn new(locale: Locale, client: MedalsClient, update_interval: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            inner: Arc::new(CoordinatorInner {
                locale,
                client,
                update_interval,
                cache: RwLock::new(CacheState::new()),
                events,
                refresh_lock: tokio::sync::Mutex::new(()),
                shutdown: ShutdownHandle::new(),
                task: Mutex::new(None),
            }),
        }
    }

    pub fn locale(&self) -> Locale {
        self.inner.locale
    }

    pub fn update_interval(&self) -> Duration {
        self.inner.update_interval
    }

    /// Consistent view of the cached payload.
    pub fn snapshot(&self) -> Option<Arc<MedalPayload>> {
        self.inner.cache.read().payload()
    }

    /// Payload and availability read under one lock.
    pub fn snapshot_with_status(&self) -> (Option<Arc<MedalPayload>>, bool) {
        let cache = self.inner.cache.read();
        (cache.payload(), cache.last_update_success())
    }

    pub fn last_update_success(&self) -> bool {
        self.inner.cache.read().last_update_success()
    }

    pub fn last_error(&self) -> Option<RefreshFailure> {
        self.inner.cache.read().last_error()
    }

    pub fn last_success_at(&self) -> Option<SystemTime> {
        self.inner.cache.read().last_success_at()
    }

    pub fn generation(&self) -> u64 {
        self.inner.cache.read().generation()
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.is_shutting_down()
    }

    /// True while the periodic refresh task is alive.
    pub fn is_running(&self) -> bool {
        self.inner.task.lock().as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CoordinatorEvent> {
        self.inner.events.subscribe()
    }

    /// Runs one fetch-validate-store cycle.
    ///
    /// Waits for any refresh already in flight. After shutdown this is a
    /// no-op.
    pub async fn refresh(&self) -> Result<(), FetchError> {
        let _guard = self.inner.refresh_lock.lock().await;
        if self.is_shut_down() {
            tracing::debug!(locale = %self.inner.locale, "Skipping refresh after shutdown");
            return Ok(());
        }

        match self.inner.client.fetch(self.inner.locale).await {
            Ok(payload) => {
                let countries = payload.medals_table().len();
                let stored = self.inner.cache.write().store(payload);
                match stored {
                    Some(generation) => {
                        tracing::info!(
                            locale = %self.inner.locale,
                            generation,
                            countries,
                            "Medal standings updated"
                        );
                        let _ = self.inner.events.send(CoordinatorEvent::Updated { generation });
                    }
                    None => {
                        tracing::debug!(locale = %self.inner.locale, "Discarding payload for disposed cache");
                    }
                }
                Ok(())
            }
            Err(err) => {
                let recorded = self.inner.cache.write().record_failure(&err);
                if recorded {
                    tracing::warn!(
                        locale = %self.inner.locale,
                        kind = %err.kind(),
                        error = %err,
                        "Medal standings update failed"
                    );
                    let _ = self.inner.events.send(CoordinatorEvent::UpdateFailed {
                        kind: err.kind(),
                        message: err.to_string(),
                    });
                }
                Err(err)
            }
        }
    }

    /// Refresh performed while an entry is being set up.
    ///
    /// A failure here means the entry is not ready and must not be
    /// registered.
    pub async fn first_refresh(&self) -> Result<(), FetchError> {
        self.refresh().await?;
        if self.snapshot().is_none() {
            // Only reachable when shut down before the first store.
            return Err(FetchError::Cancelled);
        }
        Ok(())
    }

    /// Spawns the periodic refresh task. The first tick fires one period
    /// from now. Calling this twice has no effect.
    ///
    /// A zero period, or one too large to schedule, starts nothing.
    pub fn start(&self) {
        let mut task = self.inner.task.lock();
        if task.is_some() || self.is_shut_down() {
            return;
        }

        let period = self.inner.update_interval;
        // The ticker adds the period again after every tick.
        let first_tick = Instant::now().checked_add(period);
        let second_tick = first_tick.and_then(|tick| tick.checked_add(period));
        let first_tick = match (first_tick, second_tick) {
            (Some(first_tick), Some(_)) if !period.is_zero() => first_tick,
            _ => {
                tracing::error!(
                    locale = %self.inner.locale,
                    interval_secs = period.as_secs(),
                    "Refresh interval cannot be scheduled, periodic refresh disabled"
                );
                return;
            }
        };

        let weak = Arc::downgrade(&self.inner);
        let shutdown = self.inner.shutdown.clone();
        tracing::info!(
            locale = %self.inner.locale,
            interval_secs = period.as_secs(),
            "Starting refresh task"
        );
        *task = Some(tokio::spawn(run_refresh_loop(weak, shutdown, first_tick, period)));
    }

    /// Cancels the refresh task and disposes the cache.
    ///
    /// An in-flight fetch is dropped with the task; a concurrent manual
    /// refresh that completes later finds the cache disposed.
    pub async fn shutdown(&self) {
        if self.inner.shutdown.signal() {
            tracing::info!(locale = %self.inner.locale, "Stopping coordinator");
        }

        let task = self.inner.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::warn!(locale = %self.inner.locale, error = %e, "Refresh task ended abnormally");
                }
            }
        }

        self.inner.cache.write().dispose();
    }
}

async fn run_refresh_loop(
    weak: Weak<CoordinatorInner>,
    shutdown: ShutdownHandle,
    first_tick: Instant,
    period: Duration,
) {
    let mut ticker = interval_at(first_tick, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.wait() => break,
            _ = ticker.tick() => {}
        }

        // Every handle is gone: nobody can read the cache anymore.
        let Some(inner) = weak.upgrade() else {
            break;
        };
        let coordinator = MedalCoordinator { inner };

        tokio::select! {
            _ = shutdown.wait() => break,
            _ = coordinator.refresh() => {}
        }
    }

    tracing::debug!("Refresh task stopped");
}
