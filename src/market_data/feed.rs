//! Process-lifetime feed: owns the current snapshot set, the observer registry
//! and the refresh/tick timers.
//!
//! The timers only run while at least one observer is registered. Every update
//! (refresh, tick, or the initial delivery to a new observer) happens under one
//! re-entrant notification gate, so observers never see two cycles interleave
//! and a fetch that outlives the refresh period delays the next refresh
//! instead of running alongside it.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::{Mutex, ReentrantMutex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, trace, warn};

use crate::config::FeedConfig;
use crate::market_data::fallback::fallback_snapshots;
use crate::market_data::fetcher::Fetcher;
use crate::market_data::simulator::Simulator;
use crate::market_data::types::{Snapshot, SnapshotSet};
use crate::telemetry::{OBSERVER_PANICS, REFRESH_TOTAL, SNAPSHOTS, SUBSCRIBERS, TICKS_TOTAL};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Receives every published snapshot set.
///
/// Called on the feed's timer tasks (or the registering thread for the initial
/// delivery); keep it short. Calling back into the feed from here is allowed.
pub trait SnapshotObserver: Send + Sync {
    fn on_snapshots(&self, snapshots: SnapshotSet);
}

impl<F> SnapshotObserver for F
where
    F: Fn(SnapshotSet) + Send + Sync,
{
    fn on_snapshots(&self, snapshots: SnapshotSet) {
        self(snapshots)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    /// No observers; timers stopped, last set retained.
    Idle,
    /// At least one observer; both timers running.
    Active,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub timer_starts: u64,
    pub timer_stops: u64,
    pub refreshes: u64,
    pub ticks: u64,
}

struct Timers {
    refresh: JoinHandle<()>,
    tick: JoinHandle<()>,
}

impl Timers {
    fn abort(self) {
        self.refresh.abort();
        self.tick.abort();
    }
}

struct Inner {
    snapshots: SnapshotSet,
    observers: Vec<Arc<dyn SnapshotObserver>>,
    timers: Option<Timers>,
    /// Bumped on every start so tasks from an earlier Active period can tell
    /// they have been superseded.
    generation: u64,
    stats: FeedStats,
    rng: StdRng,
}

impl Inner {
    fn is_current(&self, generation: u64) -> bool {
        self.timers.is_some() && self.generation == generation
    }
}

struct Shared {
    state: Mutex<Inner>,
    gate: ReentrantMutex<()>,
    fetcher: Fetcher,
    simulator: Simulator,
    refresh_every: Duration,
    tick_every: Duration,
    runtime: Handle,
}

enum Update {
    Refresh(Vec<Snapshot>),
    Tick,
}

/// Cheap to clone; all clones drive the same feed.
#[derive(Clone)]
pub struct FeedService {
    shared: Arc<Shared>,
}

impl FeedService {
    /// Build a feed on the current tokio runtime, seeded with the fallback set.
    ///
    /// # Panics
    /// When called outside a tokio runtime; use [`FeedService::with_runtime`]
    /// to pass a handle explicitly.
    pub fn new(fetcher: Fetcher, simulator: Simulator, config: &FeedConfig) -> Self {
        Self::with_runtime(Handle::current(), fetcher, simulator, config)
    }

    pub fn with_runtime(
        runtime: Handle,
        fetcher: Fetcher,
        simulator: Simulator,
        config: &FeedConfig,
    ) -> Self {
        let seed: SnapshotSet = fallback_snapshots().into();
        let shared = Shared {
            state: Mutex::new(Inner {
                snapshots: seed,
                observers: Vec::new(),
                timers: None,
                generation: 0,
                stats: FeedStats::default(),
                rng: StdRng::from_entropy(),
            }),
            gate: ReentrantMutex::new(()),
            fetcher,
            simulator,
            // tokio intervals panic on a zero period
            refresh_every: config.refresh_interval().max(MIN_PERIOD),
            tick_every: config.tick_interval().max(MIN_PERIOD),
            runtime,
        };
        Self { shared: Arc::new(shared) }
    }

    /// Add an observer and hand it the current set before returning.
    ///
    /// The first observer starts both timers, and the refresh timer fires
    /// straight away. Registering the same `Arc` again is a no-op that returns
    /// `false`.
    #[instrument(skip_all)]
    pub fn register(&self, observer: Arc<dyn SnapshotObserver>) -> bool {
        let _gate = self.shared.gate.lock();

        let current = {
            let mut inner = self.shared.state.lock();
            if inner.observers.iter().any(|o| same_observer(o, &observer)) {
                debug!("observer already registered, ignoring");
                return false;
            }
            inner.observers.push(Arc::clone(&observer));
            metrics::gauge!(SUBSCRIBERS).set(inner.observers.len() as f64);

            if inner.timers.is_none() {
                inner.generation += 1;
                let generation = inner.generation;
                inner.timers = Some(self.spawn_timers(generation));
                inner.stats.timer_starts += 1;
                info!(generation, "feed active");
            }
            debug!(observers = inner.observers.len(), "observer registered");
            Arc::clone(&inner.snapshots)
        };

        observer.on_snapshots(current);
        true
    }

    /// Remove an observer. Removing the last one stops both timers; an in-flight
    /// fetch is cancelled with them. Returns `false` if it was not registered.
    #[instrument(skip_all)]
    pub fn unregister(&self, observer: &Arc<dyn SnapshotObserver>) -> bool {
        let _gate = self.shared.gate.lock();

        let stopped = {
            let mut inner = self.shared.state.lock();
            let before = inner.observers.len();
            inner.observers.retain(|o| !same_observer(o, observer));
            if inner.observers.len() == before {
                return false;
            }
            metrics::gauge!(SUBSCRIBERS).set(inner.observers.len() as f64);
            debug!(observers = inner.observers.len(), "observer unregistered");

            if inner.observers.is_empty() {
                inner.stats.timer_stops += 1;
                inner.timers.take()
            } else {
                None
            }
        };

        if let Some(timers) = stopped {
            timers.abort();
            info!("feed idle");
        }
        true
    }

    /// The set most recently published (the fallback set before any fetch).
    pub fn snapshots(&self) -> SnapshotSet {
        Arc::clone(&self.shared.state.lock().snapshots)
    }

    pub fn state(&self) -> FeedState {
        if self.shared.state.lock().timers.is_some() {
            FeedState::Active
        } else {
            FeedState::Idle
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.state.lock().observers.len()
    }

    pub fn stats(&self) -> FeedStats {
        self.shared.state.lock().stats
    }

    fn spawn_timers(&self, generation: u64) -> Timers {
        let refresh_every = self.shared.refresh_every;
        let tick_every = self.shared.tick_every;

        let weak = Arc::downgrade(&self.shared);
        let refresh = self.shared.runtime.spawn(async move {
            // first tick completes immediately: that is the out-of-band fetch
            let mut interval = tokio::time::interval(refresh_every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let Some(shared) = weak.upgrade() else { break };
                // awaited inline, so a slow fetch swallows the firings it overlaps
                let fresh = shared.fetcher.fetch().await;
                shared.apply(Update::Refresh(fresh), generation);
            }
        });

        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        let tick = self.shared.runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + tick_every, tick_every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let Some(shared) = weak.upgrade() else { break };
                shared.apply(Update::Tick, generation);
            }
        });

        Timers { refresh, tick }
    }
}

impl Shared {
    /// Replace the set and fan it out. Dropped if the timers that produced it
    /// have been stopped or restarted since.
    fn apply(&self, update: Update, generation: u64) {
        let _gate = self.gate.lock();

        let (set, observers) = {
            let mut guard = self.state.lock();
            let inner = &mut *guard;
            if !inner.is_current(generation) {
                trace!(generation, "stale timer update dropped");
                return;
            }

            let next: SnapshotSet = match update {
                Update::Refresh(fresh) => {
                    inner.stats.refreshes += 1;
                    metrics::counter!(REFRESH_TOTAL).increment(1);
                    fresh.into()
                }
                Update::Tick => {
                    inner.stats.ticks += 1;
                    metrics::counter!(TICKS_TOTAL).increment(1);
                    self.simulator.tick(&mut inner.rng, &inner.snapshots).into()
                }
            };
            metrics::gauge!(SNAPSHOTS).set(next.len() as f64);

            inner.snapshots = Arc::clone(&next);
            (next, inner.observers.clone())
        };

        trace!(observers = observers.len(), tokens = set.len(), "publishing snapshot set");
        for observer in observers {
            // contain observer panics so the timer task keeps running
            let delivered =
                catch_unwind(AssertUnwindSafe(|| observer.on_snapshots(Arc::clone(&set))));
            if delivered.is_err() {
                metrics::counter!(OBSERVER_PANICS).increment(1);
                warn!(generation, "observer panicked during delivery, continuing");
            }
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Some(timers) = self.state.get_mut().timers.take() {
            timers.abort();
        }
    }
}

/// Identity is the shared allocation, not the vtable.
fn same_observer(a: &Arc<dyn SnapshotObserver>, b: &Arc<dyn SnapshotObserver>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}
