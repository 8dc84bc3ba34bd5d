//! Lock-free poller counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by the poller as it runs.
#[derive(Debug, Default)]
pub struct PollerStats {
    ticks: AtomicU64,
    overlapping_ticks: AtomicU64,
    fetch_failures: AtomicU64,
    accepted: AtomicU64,
    stale: AtomicU64,
}

impl PollerStats {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_overlap(&self) {
        self.overlapping_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_stale(&self) {
        self.stale.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters.
    pub fn snapshot(&self) -> PollerStatsSnapshot {
        PollerStatsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            overlapping_ticks: self.overlapping_ticks.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            accepted: self.accepted.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
        }
    }
}

/// Copy of [`PollerStats`] at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollerStatsSnapshot {
    /// Timer ticks observed.
    pub ticks: u64,
    /// Ticks skipped because a fetch was outstanding.
    pub overlapping_ticks: u64,
    /// Fetches that failed (transport or decode).
    pub fetch_failures: u64,
    /// Snapshots delivered to the consumer.
    pub accepted: u64,
    /// Snapshots discarded because the generation did not advance.
    pub stale: u64,
}

impl PollerStatsSnapshot {
    /// Fetches started (ticks that were not skipped).
    pub fn fetches(&self) -> u64 {
        self.ticks.saturating_sub(self.overlapping_ticks)
    }
}
