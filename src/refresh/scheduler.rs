//! The refresh scheduler: trigger coalescing and run execution.
//!
//! All three trigger sources (startup, periodic tick, manual request) funnel
//! into one driver task that executes runs inline, so mutual exclusion is
//! structural rather than lock-based. Manual triggers pass through a bounded
//! queue of depth one: a trigger that arrives while a run is in flight
//! occupies the slot and produces exactly one follow-up run; further triggers
//! in that window are dropped as satisfied by the pending run.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backends::Accessor;
use crate::cache::{CacheStore, Snapshot};
use crate::observability::MetricsRecorder;

/// What caused a refresh run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// The one-shot run fired when the scheduler starts
    Startup,
    /// The fixed-interval timer
    Periodic,
    /// An operator-initiated request
    Manual,
}

impl TriggerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Periodic => "periodic",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic summary of one completed refresh run.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub run_id: Uuid,
    pub trigger: TriggerKind,
    pub item_count: usize,
    pub failed_backends: Vec<String>,
    pub duration: Duration,
}

/// Owns refresh execution against a set of accessors and a cache store.
///
/// Construct with [`RefreshScheduler::new`], then either [`spawn`] the driver
/// task (startup + periodic + manual triggers) or drive runs synchronously
/// with [`run_once`] when embedding.
///
/// [`spawn`]: RefreshScheduler::spawn
/// [`run_once`]: RefreshScheduler::run_once
#[derive(Debug)]
pub struct RefreshScheduler {
    store: Arc<CacheStore>,
    accessors: Vec<Arc<dyn Accessor>>,
    interval: Duration,
    backend_timeout: Duration,
    metrics: MetricsRecorder,
}

/// Handle for requesting refreshes from a spawned scheduler.
///
/// Dropping every handle stops the driver task after its current run.
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    trigger_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Request a refresh without waiting for it to run or complete.
    ///
    /// Returns `false` when the request was coalesced into an already
    /// pending run. Never blocks.
    pub fn trigger_now(&self) -> bool {
        self.trigger_tx.try_send(()).is_ok()
    }
}

impl RefreshScheduler {
    pub fn new(
        store: Arc<CacheStore>,
        accessors: Vec<Arc<dyn Accessor>>,
        interval: Duration,
        backend_timeout: Duration,
    ) -> Self {
        Self { store, accessors, interval, backend_timeout, metrics: MetricsRecorder::new() }
    }

    /// Start the driver task and return the trigger handle.
    ///
    /// The startup refresh begins immediately but asynchronously; callers
    /// proceed to serve requests without waiting on it.
    pub fn spawn(self) -> RefreshHandle {
        let (trigger_tx, trigger_rx) = mpsc::channel(1);
        tokio::spawn(self.run_loop(trigger_rx));
        RefreshHandle { trigger_tx }
    }

    async fn run_loop(self, mut triggers: mpsc::Receiver<()>) {
        // The first tick fires immediately and doubles as the startup
        // trigger; subsequent ticks stay aligned to scheduler start. A run
        // overlapping a tick absorbs it instead of queueing a second run.
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut started = false;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let trigger =
                        if started { TriggerKind::Periodic } else { TriggerKind::Startup };
                    started = true;
                    self.run_once(trigger).await;
                }
                received = triggers.recv() => match received {
                    Some(()) => {
                        self.run_once(TriggerKind::Manual).await;
                    }
                    None => {
                        debug!("All refresh handles dropped; stopping scheduler");
                        break;
                    }
                },
            }
        }
    }

    /// Execute one fetch-aggregate-publish run across all accessors.
    ///
    /// Backends are queried concurrently, each bounded by the configured
    /// timeout. A failing or timed-out backend contributes no items and is
    /// recorded against the run; the remaining backends' items are still
    /// aggregated and published. Publishing is a single snapshot swap and
    /// cannot fail once aggregation has produced a snapshot.
    pub async fn run_once(&self, trigger: TriggerKind) -> RefreshOutcome {
        let run_id = Uuid::new_v4();
        let started_at = Instant::now();
        info!(
            run_id = %run_id,
            trigger = %trigger,
            backends = self.accessors.len(),
            "Starting cache refresh"
        );

        let fetches = self.accessors.iter().map(|accessor| {
            let accessor = accessor.clone();
            let deadline = self.backend_timeout;
            async move {
                let fetch_started = Instant::now();
                let outcome = tokio::time::timeout(deadline, accessor.fetch_all()).await;
                (accessor, fetch_started.elapsed(), outcome)
            }
        });

        let mut items = Vec::new();
        let mut failed_backends = Vec::new();
        for (accessor, elapsed, outcome) in join_all(fetches).await {
            match outcome {
                Ok(Ok(batch)) => {
                    debug!(
                        run_id = %run_id,
                        backend = %accessor.name(),
                        items = batch.len(),
                        "Backend fetch succeeded"
                    );
                    self.metrics.record_backend_fetch(accessor.name(), true, elapsed);
                    items.extend(batch);
                }
                Ok(Err(err)) => {
                    warn!(
                        run_id = %run_id,
                        backend = %accessor.name(),
                        error = %err,
                        "Backend fetch failed; it contributes no items this run"
                    );
                    self.metrics.record_backend_fetch(accessor.name(), false, elapsed);
                    failed_backends.push(accessor.name().to_string());
                }
                Err(_) => {
                    warn!(
                        run_id = %run_id,
                        backend = %accessor.name(),
                        timeout_secs = self.backend_timeout.as_secs(),
                        "Backend fetch timed out; it contributes no items this run"
                    );
                    self.metrics.record_backend_fetch(accessor.name(), false, elapsed);
                    failed_backends.push(accessor.name().to_string());
                }
            }
        }

        let snapshot = Snapshot::from_items(items);
        let item_count = snapshot.len();
        self.store.replace(snapshot).await;

        let duration = started_at.elapsed();
        self.metrics.record_refresh_run(trigger.as_str(), duration, item_count);
        info!(
            run_id = %run_id,
            trigger = %trigger,
            items = item_count,
            failed_backends = failed_backends.len(),
            duration_ms = duration.as_millis() as u64,
            "Cache refresh complete"
        );

        RefreshOutcome { run_id, trigger, item_count, failed_backends, duration }
    }
}
