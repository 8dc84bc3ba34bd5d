//! Earthquake feed access
//!
//! This module fetches the USGS GeoJSON summary feed and decodes it into
//! [`FeedSnapshot`]s. Transport is abstracted behind [`AsyncHttpClient`] so
//! that the client and the poller can be tested without a network.
//!
//! ```ignore
//! use quakewatch::feed::{FeedClient, ReqwestClient};
//!
//! let client = FeedClient::new(ReqwestClient::with_timeout(30)?, base_url, "all_hour.geojson");
//! let snapshot = client.fetch(None).await?;
//! ```

mod client;
mod decode;
mod error;
mod http;
mod model;

pub use client::{FeedClient, DEFAULT_BASE_URL, DEFAULT_RESOURCE};
pub use decode::decode_snapshot;
pub use error::FeedError;
pub use http::{AsyncHttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use model::{EventRecord, FeedSnapshot};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
