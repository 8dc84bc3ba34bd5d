//! Decoded feed data model.

use chrono::{DateTime, Utc};

use crate::geo::GeoPoint;

/// One decoded poll of the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    /// Time the feed was generated, in epoch milliseconds.
    ///
    /// Non-decreasing across polls of the same feed; an unchanged value means
    /// the feed has not been regenerated.
    pub generation: i64,
    /// Events in feed order.
    pub events: Vec<EventRecord>,
}

impl FeedSnapshot {
    /// Generation marker as a UTC timestamp, if representable.
    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.generation)
    }
}

/// A single seismic event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Origin time of the event.
    pub timestamp: DateTime<Utc>,
    /// Magnitude, when the feed reports one.
    pub magnitude: Option<f64>,
    /// Epicenter.
    pub location: GeoPoint,
    /// Hypocenter depth in kilometers.
    pub depth_km: f64,
    /// Region description supplied by the feed, e.g. "10 km SW of Volcano, Hawaii".
    pub place: Option<String>,
}
