//! QuakeWatch - live earthquake feed with nearest-city annotation
//!
//! This library polls a GeoJSON earthquake feed, delivers only snapshots
//! whose generation marker has advanced, and annotates each event with the
//! nearest known population centers.
//!
//! # Modules
//!
//! - [`geo`] - coordinates and great-circle distance
//! - [`cities`] - reference city list and k-nearest-neighbor index
//! - [`feed`] - HTTP transport and GeoJSON decoding
//! - [`poller`] - change-aware, non-overlapping periodic polling
//! - [`annotate`] - joining events with their nearest cities
//! - [`config`] - INI configuration file
//! - [`logging`] - `tracing` subscriber setup

pub mod annotate;
pub mod cities;
pub mod config;
pub mod feed;
pub mod geo;
pub mod logging;
pub mod poller;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
