//! Feed client: resolves resource paths and decodes responses.

use tracing::debug;

use super::decode::decode_snapshot;
use super::error::FeedError;
use super::http::AsyncHttpClient;
use super::model::FeedSnapshot;

/// Default base address of the USGS summary feeds.
pub const DEFAULT_BASE_URL: &str = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/";

/// Default feed resource: all events in the past hour.
pub const DEFAULT_RESOURCE: &str = "all_hour.geojson";

/// Async client for a GeoJSON earthquake feed.
///
/// # Example
///
/// ```ignore
/// use quakewatch::feed::{FeedClient, ReqwestClient};
///
/// let client = FeedClient::usgs(ReqwestClient::new()?);
/// let snapshot = client.fetch(None).await?;
/// println!("{} events", snapshot.events.len());
/// ```
#[derive(Debug, Clone)]
pub struct FeedClient<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
    default_resource: String,
}

impl<C: AsyncHttpClient> FeedClient<C> {
    /// Creates a client for the given base address and default resource.
    pub fn new(
        http_client: C,
        base_url: impl Into<String>,
        default_resource: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            default_resource: default_resource.into(),
        }
    }

    /// Creates a client for the USGS past-hour feed.
    pub fn usgs(http_client: C) -> Self {
        Self::new(http_client, DEFAULT_BASE_URL, DEFAULT_RESOURCE)
    }

    /// The resource fetched when none is given.
    pub fn default_resource(&self) -> &str {
        &self.default_resource
    }

    /// The URL requested for `resource`, or for the default resource when
    /// `None`.
    pub fn resource_url(&self, resource: Option<&str>) -> String {
        self.build_url(resource.unwrap_or(self.default_resource.as_str()))
    }

    /// Builds the absolute URL for a resource relative to the base address.
    fn build_url(&self, resource: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            resource.trim_start_matches('/')
        )
    }

    /// Fetches and decodes one snapshot.
    ///
    /// `None` fetches the default resource.
    pub async fn fetch(&self, resource: Option<&str>) -> Result<FeedSnapshot, FeedError> {
        let url = self.resource_url(resource);
        debug!(url = %url, "Fetching feed");

        let body = self.http_client.get(&url).await?;
        let snapshot = decode_snapshot(&body)?;

        debug!(
            url = %url,
            bytes = body.len(),
            events = snapshot.events.len(),
            generation = snapshot.generation,
            "Feed decoded"
        );
        Ok(snapshot)
    }
}
