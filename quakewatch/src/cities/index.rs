//! Bounded k-nearest-neighbor index over a fixed reference set.
//!
//! Queries scan the whole reference set once and keep only the best `k`
//! candidates in an ascending working buffer. A candidate that is no closer
//! than the current k-th best is rejected with a single comparison, so the
//! full set is never sorted.

use thiserror::Error;
use tracing::debug;

use super::types::{NeighborResult, ReferencePoint};
use crate::geo::{distance_meters, GeoPoint};

/// Default number of neighbors reported per event.
pub const DEFAULT_NEIGHBOR_COUNT: usize = 3;

/// Errors raised while building an index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// The reference set contained no points.
    #[error("Reference set is empty; at least one point is required")]
    EmptyReferenceSet,

    /// A reference point has a non-finite or out-of-range coordinate.
    #[error("Reference point {position} ('{label}') has an invalid location")]
    InvalidPoint { position: usize, label: String },
}

/// Immutable nearest-neighbor index.
///
/// The reference set is fixed at construction, so the index is `Send + Sync`
/// and can be queried concurrently through an `Arc` without locking.
///
/// # Example
///
/// ```
/// use quakewatch::cities::{NearestNeighborIndex, ReferencePoint};
/// use quakewatch::geo::GeoPoint;
///
/// let index = NearestNeighborIndex::new(vec![
///     ReferencePoint::new("A", 0.0, 0.0),
///     ReferencePoint::new("B", 0.0, 1.0),
///     ReferencePoint::new("C", 0.0, 5.0),
/// ])
/// .unwrap();
///
/// let nearest = index.query(GeoPoint::new(0.0, 0.5), 2);
/// assert_eq!(nearest[0].point.label, "A");
/// assert_eq!(nearest[1].point.label, "B");
/// ```
#[derive(Debug, Clone)]
pub struct NearestNeighborIndex {
    points: Vec<ReferencePoint>,
}

/// Working-buffer entry: distance plus position in the reference set.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    index: usize,
}

impl NearestNeighborIndex {
    /// Builds an index over `points`.
    ///
    /// Returns [`IndexError::EmptyReferenceSet`] if `points` is empty, and
    /// [`IndexError::InvalidPoint`] for the first point whose location is not
    /// a valid coordinate. Every stored point therefore has a finite distance
    /// to any finite query point.
    pub fn new(points: Vec<ReferencePoint>) -> Result<Self, IndexError> {
        if points.is_empty() {
            return Err(IndexError::EmptyReferenceSet);
        }
        if let Some((position, point)) = points.iter().enumerate().find(|(_, p)| {
            GeoPoint::validated(p.location.latitude, p.location.longitude).is_err()
        }) {
            return Err(IndexError::InvalidPoint {
                position,
                label: point.label.clone(),
            });
        }
        debug!(points = points.len(), "Nearest-neighbor index built");
        Ok(Self { points })
    }

    /// Number of reference points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; an index cannot be built from an empty set.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The reference points in their original order.
    pub fn points(&self) -> &[ReferencePoint] {
        &self.points
    }

    /// Returns the `k` reference points closest to `at`, nearest first.
    ///
    /// The result holds `min(k, len())` entries in non-decreasing distance
    /// order. Equal distances keep reference-set order: the point that appears
    /// earlier in the set ranks first. `k == 0` yields an empty result.
    pub fn query(&self, at: GeoPoint, k: usize) -> Vec<NeighborResult> {
        if k == 0 {
            return Vec::new();
        }

        let mut best: Vec<Candidate> = Vec::with_capacity(k.min(self.points.len()) + 1);

        for (index, point) in self.points.iter().enumerate() {
            let distance = distance_meters(at, point.location);
            if distance.is_nan() {
                continue;
            }
            let candidate = Candidate { distance, index };

            if best.len() < k {
                insert_after_equals(&mut best, candidate);
                continue;
            }

            match best.last() {
                Some(worst) if distance >= worst.distance => {}
                _ => {
                    insert_after_equals(&mut best, candidate);
                    best.pop();
                }
            }
        }

        best.into_iter()
            .map(|c| NeighborResult {
                point: self.points[c.index].clone(),
                distance_meters: c.distance,
            })
            .collect()
    }
}

/// Inserts before the first entry whose distance exceeds the candidate's.
///
/// Entries with an equal distance stay ahead of the new one.
#[inline]
fn insert_after_equals(best: &mut Vec<Candidate>, candidate: Candidate) {
    let position = best.partition_point(|c| c.distance <= candidate.distance);
    best.insert(position, candidate);
}
