//! Change-aware feed polling
//!
//! The [`ChangeAwarePoller`] drives periodic fetches of a
//! [`SnapshotSource`] and forwards a snapshot to its consumer only when the
//! feed's generation marker has advanced.
//!
//! # State Machine
//!
//! ```text
//! Idle --[tick]--> Fetching --[fetch ok, generation advanced]--> deliver --> Idle
//!                           --[fetch ok, generation unchanged]--> Idle
//!                           --[fetch failed]--------------------> Idle
//! Fetching --[tick]--> Fetching (skipped)
//! ```
//!
//! # Thread Safety
//!
//! Phase and last accepted generation live behind a single mutex; the
//! in-flight check and the transition to `Fetching` happen in one critical
//! section. Counters are lock-free atomics.

mod change_aware;
mod source;
mod state;
mod stats;

pub use change_aware::{ChangeAwarePoller, PollerError, SnapshotConsumer, TickOutcome};
pub use source::{source_fn, FnSource, SnapshotSource};
pub use state::PollerPhase;
pub use stats::{PollerStats, PollerStatsSnapshot};
