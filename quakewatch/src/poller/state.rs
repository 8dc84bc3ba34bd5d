//! Poller state machine.
//!
//! ```text
//! Idle --[tick]--> Fetching --[result handled]--> Idle
//! Fetching --[tick]--> Fetching (no-op)
//! ```
//!
//! All transitions run while the caller holds the poller's state mutex, so
//! the in-flight check and the move to `Fetching` are a single atomic step.

/// Phase of the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerPhase {
    /// No fetch outstanding; the next tick starts one.
    Idle,
    /// A fetch (and delivery of its result) is outstanding.
    Fetching,
}

/// Outcome of offering a fetched generation to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Acceptance {
    /// The generation advanced and was recorded.
    Accepted { previous: Option<i64> },
    /// The generation did not advance past `last`.
    Stale { last: i64 },
}

/// Mutable poller state.
#[derive(Debug)]
pub(crate) struct PollerState {
    phase: PollerPhase,
    last_accepted_generation: Option<i64>,
}

impl PollerState {
    pub(crate) fn new() -> Self {
        Self {
            phase: PollerPhase::Idle,
            last_accepted_generation: None,
        }
    }

    pub(crate) fn phase(&self) -> PollerPhase {
        self.phase
    }

    pub(crate) fn last_accepted_generation(&self) -> Option<i64> {
        self.last_accepted_generation
    }

    /// Moves `Idle` to `Fetching`. Returns false if a fetch is outstanding.
    pub(crate) fn try_begin_fetch(&mut self) -> bool {
        match self.phase {
            PollerPhase::Idle => {
                self.phase = PollerPhase::Fetching;
                true
            }
            PollerPhase::Fetching => false,
        }
    }

    pub(crate) fn finish_fetch(&mut self) {
        self.phase = PollerPhase::Idle;
    }

    /// Records `generation` if it is the first or strictly newer.
    pub(crate) fn offer(&mut self, generation: i64) -> Acceptance {
        match self.last_accepted_generation {
            Some(last) if generation <= last => Acceptance::Stale { last },
            previous => {
                self.last_accepted_generation = Some(generation);
                Acceptance::Accepted { previous }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = PollerState::new();
        assert_eq!(state.phase(), PollerPhase::Idle);
        assert_eq!(state.last_accepted_generation(), None);
    }

    #[test]
    fn test_begin_fetch_only_once() {
        let mut state = PollerState::new();

        assert!(state.try_begin_fetch());
        assert_eq!(state.phase(), PollerPhase::Fetching);
        assert!(!state.try_begin_fetch());

        state.finish_fetch();
        assert_eq!(state.phase(), PollerPhase::Idle);
        assert!(state.try_begin_fetch());
    }

    #[test]
    fn test_first_generation_is_accepted() {
        let mut state = PollerState::new();
        assert_eq!(state.offer(100), Acceptance::Accepted { previous: None });
        assert_eq!(state.last_accepted_generation(), Some(100));
    }

    #[test]
    fn test_equal_generation_is_stale() {
        let mut state = PollerState::new();
        state.offer(100);
        assert_eq!(state.offer(100), Acceptance::Stale { last: 100 });
    }

    #[test]
    fn test_older_generation_is_stale_and_keeps_marker() {
        let mut state = PollerState::new();
        state.offer(100);
        assert_eq!(state.offer(99), Acceptance::Stale { last: 100 });
        assert_eq!(state.last_accepted_generation(), Some(100));
    }

    #[test]
    fn test_newer_generation_is_accepted() {
        let mut state = PollerState::new();
        state.offer(100);
        assert_eq!(
            state.offer(101),
            Acceptance::Accepted {
                previous: Some(100)
            }
        );
    }
}
