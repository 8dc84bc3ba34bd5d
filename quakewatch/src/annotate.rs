//! Annotating feed events with their nearest reference cities.

use crate::cities::{NearestNeighborIndex, NeighborResult};
use crate::feed::{EventRecord, FeedSnapshot};

/// An event together with its nearest cities, nearest first.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedEvent {
    pub event: EventRecord,
    pub nearest: Vec<NeighborResult>,
}

impl AnnotatedEvent {
    /// Nearest cities as `"Name (12.3 km), Other (45.6 km)"`.
    pub fn nearest_summary(&self) -> String {
        format_neighbors(&self.nearest)
    }
}

/// Looks up the `k` nearest cities for every event in `snapshot`.
///
/// Output order follows feed order.
pub fn annotate_snapshot(
    snapshot: &FeedSnapshot,
    index: &NearestNeighborIndex,
    k: usize,
) -> Vec<AnnotatedEvent> {
    snapshot
        .events
        .iter()
        .map(|event| AnnotatedEvent {
            nearest: index.query(event.location, k),
            event: event.clone(),
        })
        .collect()
}

/// Joins neighbor results with `", "`.
pub fn format_neighbors(neighbors: &[NeighborResult]) -> String {
    neighbors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
