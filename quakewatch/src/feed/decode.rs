//! GeoJSON feed decoding.
//!
//! The wire format is the USGS earthquake summary feed:
//!
//! ```text
//! {
//!   "metadata": { "generated": 1700000000000, ... },
//!   "features": [
//!     {
//!       "properties": { "time": 1699999000000, "mag": 2.1, "place": "..." },
//!       "geometry": { "coordinates": [lon, lat, depth] }
//!     }
//!   ]
//! }
//! ```
//!
//! GeoJSON positions are `[longitude, latitude, depth]`. This module is the
//! only place that reads them positionally.

use chrono::DateTime;
use serde::Deserialize;

use super::error::FeedError;
use super::model::{EventRecord, FeedSnapshot};
use crate::geo::GeoPoint;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    metadata: Metadata,
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    generated: i64,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Properties,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Properties {
    time: i64,
    mag: Option<f64>,
    #[serde(default)]
    place: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<f64>,
}

/// Decodes a feed document into a [`FeedSnapshot`].
///
/// Fails with [`FeedError::Decode`] for malformed JSON and
/// [`FeedError::InvalidFeature`] when a feature has fewer than three
/// coordinates or an unrepresentable timestamp.
pub fn decode_snapshot(body: &[u8]) -> Result<FeedSnapshot, FeedError> {
    let collection: FeatureCollection = serde_json::from_slice(body)?;

    let events = collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| decode_feature(index, feature))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeedSnapshot {
        generation: collection.metadata.generated,
        events,
    })
}

fn decode_feature(index: usize, feature: Feature) -> Result<EventRecord, FeedError> {
    let (longitude, latitude, depth_km) = match feature.geometry.coordinates.as_slice() {
        [lon, lat, depth, ..] => (*lon, *lat, *depth),
        other => {
            return Err(FeedError::InvalidFeature {
                index,
                reason: format!("expected [lon, lat, depth], got {} values", other.len()),
            })
        }
    };

    let timestamp = DateTime::from_timestamp_millis(feature.properties.time).ok_or_else(|| {
        FeedError::InvalidFeature {
            index,
            reason: format!("timestamp {} out of range", feature.properties.time),
        }
    })?;

    Ok(EventRecord {
        timestamp,
        magnitude: feature.properties.mag,
        location: GeoPoint::new(latitude, longitude),
        depth_km,
        place: feature.properties.place,
    })
}
