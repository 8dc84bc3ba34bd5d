//! The change-aware polling loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::source::SnapshotSource;
use super::state::{Acceptance, PollerPhase, PollerState};
use super::stats::{PollerStats, PollerStatsSnapshot};
use crate::feed::FeedSnapshot;

/// Callback receiving each accepted snapshot.
pub type SnapshotConsumer = Arc<dyn Fn(FeedSnapshot) + Send + Sync>;

/// Errors raised when constructing a poller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollerError {
    /// The polling interval must be non-zero.
    #[error("Polling interval must be greater than zero")]
    InvalidInterval,
}

/// Result of a single timer tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// A fetch was started on a new task.
    Started(JoinHandle<()>),
    /// A fetch was already outstanding; nothing was started.
    Skipped,
    /// The poller has been stopped.
    Stopped,
}

impl TickOutcome {
    /// True if this tick started a fetch.
    pub fn is_started(&self) -> bool {
        matches!(self, TickOutcome::Started(_))
    }
}

struct PollerShared<S> {
    source: S,
    consumer: SnapshotConsumer,
    interval: Duration,
    state: Mutex<PollerState>,
    stats: PollerStats,
    shutdown: CancellationToken,
}

/// Periodically fetches a feed and forwards only new snapshots.
///
/// - At most one fetch is outstanding at any time; ticks that fire while a
///   fetch is running are no-ops.
/// - A snapshot is delivered only if its generation is strictly greater than
///   the last delivered one, so the consumer sees strictly increasing
///   generations.
/// - Fetch failures are logged and retried on the next tick; they never stop
///   the timer.
///
/// The consumer runs on the fetch task, before the poller returns to `Idle`,
/// so invocations for one poller never overlap. The poller is cheap to clone;
/// clones share state.
///
/// # Example
///
/// ```ignore
/// use quakewatch::feed::{FeedClient, ReqwestClient};
/// use quakewatch::poller::ChangeAwarePoller;
/// use tokio_util::sync::CancellationToken;
///
/// let client = FeedClient::usgs(ReqwestClient::new()?);
/// let poller = ChangeAwarePoller::new(client, Duration::from_secs(60), |snapshot| {
///     println!("{} events", snapshot.events.len());
/// })?;
///
/// let shutdown = CancellationToken::new();
/// let handle = poller.spawn(shutdown.clone());
/// // ...
/// shutdown.cancel();
/// handle.await?;
/// ```
pub struct ChangeAwarePoller<S> {
    shared: Arc<PollerShared<S>>,
}

impl<S> Clone for ChangeAwarePoller<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: SnapshotSource> ChangeAwarePoller<S> {
    /// Creates a poller in the `Idle` phase with no accepted generation.
    ///
    /// Returns [`PollerError::InvalidInterval`] for a zero interval.
    pub fn new<F>(source: S, interval: Duration, consumer: F) -> Result<Self, PollerError>
    where
        F: Fn(FeedSnapshot) + Send + Sync + 'static,
    {
        Self::with_consumer(source, interval, Arc::new(consumer))
    }

    /// Creates a poller from an already shared consumer.
    pub fn with_consumer(
        source: S,
        interval: Duration,
        consumer: SnapshotConsumer,
    ) -> Result<Self, PollerError> {
        if interval.is_zero() {
            return Err(PollerError::InvalidInterval);
        }

        Ok(Self {
            shared: Arc::new(PollerShared {
                source,
                consumer,
                interval,
                state: Mutex::new(PollerState::new()),
                stats: PollerStats::new(),
                shutdown: CancellationToken::new(),
            }),
        })
    }

    /// Polling interval.
    pub fn interval(&self) -> Duration {
        self.shared.interval
    }

    /// Current phase.
    pub fn phase(&self) -> PollerPhase {
        self.shared.state.lock().phase()
    }

    /// Generation of the last snapshot delivered to the consumer.
    pub fn last_accepted_generation(&self) -> Option<i64> {
        self.shared.state.lock().last_accepted_generation()
    }

    /// Counters since construction.
    pub fn stats(&self) -> PollerStatsSnapshot {
        self.shared.stats.snapshot()
    }

    /// True once [`stop`](Self::stop) has been called.
    pub fn is_stopped(&self) -> bool {
        self.shared.shutdown.is_cancelled()
    }

    /// Stops the timer loop.
    ///
    /// An outstanding fetch is allowed to finish, but its result is discarded.
    pub fn stop(&self) {
        if !self.shared.shutdown.is_cancelled() {
            info!("Stopping feed poller");
        }
        self.shared.shutdown.cancel();
    }

    /// Handles one timer firing.
    ///
    /// Starts a fetch on a new tokio task if none is outstanding. Must be
    /// called from within a tokio runtime.
    pub fn tick(&self) -> TickOutcome {
        if self.shared.shutdown.is_cancelled() {
            return TickOutcome::Stopped;
        }
        self.shared.stats.record_tick();

        // Check and set under one lock so two ticks cannot both start a fetch
        let started = self.shared.state.lock().try_begin_fetch();
        if !started {
            self.shared.stats.record_overlap();
            debug!("Previous fetch still running, skipping tick");
            return TickOutcome::Skipped;
        }

        let shared = Arc::clone(&self.shared);
        TickOutcome::Started(tokio::spawn(async move {
            shared.fetch_and_deliver().await;
        }))
    }

    /// Runs the timer loop until `shutdown` is cancelled or
    /// [`stop`](Self::stop) is called.
    ///
    /// Cancelling `shutdown` stops the poller, so a fetch still in flight is
    /// discarded. The first tick fires immediately. Ticks that fall behind are
    /// skipped rather than bunched up.
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.shared.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            interval_ms = self.shared.interval.as_millis() as u64,
            "Feed poller started"
        );

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    self.stop();
                    break;
                }
                _ = self.shared.shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    self.tick();
                }
            }
        }

        let stats = self.stats();
        info!(
            ticks = stats.ticks,
            accepted = stats.accepted,
            stale = stats.stale,
            failures = stats.fetch_failures,
            "Feed poller stopped"
        );
    }

    /// Runs the timer loop on a new tokio task until `shutdown` is cancelled.
    pub fn spawn(&self, shutdown: CancellationToken) -> JoinHandle<()> {
        let poller = self.clone();
        tokio::spawn(async move { poller.run(shutdown).await })
    }
}

/// Returns the poller to `Idle` when the fetch task ends, even if the
/// consumer panics.
struct FetchGuard<'a> {
    state: &'a Mutex<PollerState>,
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().finish_fetch();
    }
}

impl<S: SnapshotSource> PollerShared<S> {
    async fn fetch_and_deliver(&self) {
        let _guard = FetchGuard { state: &self.state };
        let started = Instant::now();

        let snapshot = match self.source.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.stats.record_failure();
                warn!(
                    error = %e,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Feed fetch failed, will retry on next tick"
                );
                return;
            }
        };

        if self.shutdown.is_cancelled() {
            debug!(
                generation = snapshot.generation,
                "Poller stopped during fetch, discarding snapshot"
            );
            return;
        }

        let acceptance = self.state.lock().offer(snapshot.generation);
        match acceptance {
            Acceptance::Accepted { previous } => {
                self.stats.record_accepted();
                info!(
                    events = snapshot.events.len(),
                    generation = snapshot.generation,
                    previous_generation = ?previous,
                    generated_at = ?snapshot.generated_at(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Received new feed snapshot"
                );
                (self.consumer)(snapshot);
            }
            Acceptance::Stale { last } => {
                self.stats.record_stale();
                info!(
                    generation = snapshot.generation,
                    last_accepted = last,
                    "No new feed data available"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedError;
    use crate::poller::source_fn;
    use std::sync::atomic::{AtomicI64, Ordering};

    fn snapshot(generation: i64) -> FeedSnapshot {
        FeedSnapshot {
            generation,
            events: Vec::new(),
        }
    }

    #[test]
    fn test_zero_interval_rejected() {
        let source = source_fn(|| async { Ok::<_, FeedError>(snapshot(1)) });
        let result = ChangeAwarePoller::new(source, Duration::ZERO, |_| {});
        assert_eq!(result.err(), Some(PollerError::InvalidInterval));
    }

    #[tokio::test]
    async fn test_initial_state() {
        let source = source_fn(|| async { Ok::<_, FeedError>(snapshot(1)) });
        let poller = ChangeAwarePoller::new(source, Duration::from_secs(1), |_| {}).unwrap();

        assert_eq!(poller.phase(), PollerPhase::Idle);
        assert_eq!(poller.last_accepted_generation(), None);
        assert_eq!(poller.interval(), Duration::from_secs(1));
        assert!(!poller.is_stopped());
    }

    #[tokio::test]
    async fn test_tick_delivers_first_snapshot() {
        let delivered = Arc::new(AtomicI64::new(0));
        let sink = Arc::clone(&delivered);

        let source = source_fn(|| async { Ok::<_, FeedError>(snapshot(100)) });
        let poller = ChangeAwarePoller::new(source, Duration::from_secs(1), move |s| {
            sink.store(s.generation, Ordering::SeqCst);
        })
        .unwrap();

        match poller.tick() {
            TickOutcome::Started(handle) => handle.await.unwrap(),
            other => panic!("Expected Started, got {:?}", other),
        }

        assert_eq!(delivered.load(Ordering::SeqCst), 100);
        assert_eq!(poller.last_accepted_generation(), Some(100));
        assert_eq!(poller.phase(), PollerPhase::Idle);
    }

    #[tokio::test]
    async fn test_panicking_consumer_returns_poller_to_idle() {
        let source = source_fn(|| async { Ok::<_, FeedError>(snapshot(1)) });
        let poller = ChangeAwarePoller::new(source, Duration::from_secs(1), |_| {
            panic!("consumer failure");
        })
        .unwrap();

        if let TickOutcome::Started(handle) = poller.tick() {
            assert!(handle.await.is_err());
        }

        assert_eq!(poller.phase(), PollerPhase::Idle);
        assert!(poller.tick().is_started());
    }

    #[tokio::test]
    async fn test_tick_after_stop_does_nothing() {
        let source = source_fn(|| async { Ok::<_, FeedError>(snapshot(1)) });
        let poller = ChangeAwarePoller::new(source, Duration::from_secs(1), |_| {}).unwrap();

        poller.stop();
        assert!(poller.is_stopped());
        assert!(matches!(poller.tick(), TickOutcome::Stopped));
        assert_eq!(poller.stats().ticks, 0);
    }
}
