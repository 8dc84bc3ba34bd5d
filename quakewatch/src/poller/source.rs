//! Snapshot sources polled by the [`ChangeAwarePoller`](super::ChangeAwarePoller).

use std::future::Future;

use crate::feed::{AsyncHttpClient, FeedClient, FeedError, FeedSnapshot};

/// A zero-argument asynchronous fetch of the current feed snapshot.
///
/// Implemented by [`FeedClient`] (fetching its default resource) and by
/// closures wrapped with [`source_fn`].
pub trait SnapshotSource: Send + Sync + 'static {
    /// Fetches and decodes the current snapshot.
    fn fetch_snapshot(&self) -> impl Future<Output = Result<FeedSnapshot, FeedError>> + Send;
}

impl<C: AsyncHttpClient + 'static> SnapshotSource for FeedClient<C> {
    async fn fetch_snapshot(&self) -> Result<FeedSnapshot, FeedError> {
        self.fetch(None).await
    }
}

/// Adapter turning an async closure into a [`SnapshotSource`].
pub struct FnSource<F>(F);

/// Wraps a closure returning a snapshot future as a [`SnapshotSource`].
///
/// ```
/// use quakewatch::feed::{FeedError, FeedSnapshot};
/// use quakewatch::poller::source_fn;
///
/// let source = source_fn(|| async {
///     Ok::<_, FeedError>(FeedSnapshot { generation: 1, events: Vec::new() })
/// });
/// ```
pub fn source_fn<F, Fut>(f: F) -> FnSource<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<FeedSnapshot, FeedError>> + Send,
{
    FnSource(f)
}

impl<F, Fut> SnapshotSource for FnSource<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<FeedSnapshot, FeedError>> + Send,
{
    fn fetch_snapshot(&self) -> impl Future<Output = Result<FeedSnapshot, FeedError>> + Send {
        (self.0)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::MockAsyncHttpClient;

    #[tokio::test]
    async fn test_feed_client_fetches_default_resource() {
        let http = MockAsyncHttpClient::new(Ok(br#"{"metadata":{"generated":7}}"#.to_vec()));
        let client = FeedClient::new(http, "http://feed.test", "quakes.json");

        let snapshot = client.fetch_snapshot().await.unwrap();
        assert_eq!(snapshot.generation, 7);
    }

    #[tokio::test]
    async fn test_closure_source() {
        let source = source_fn(|| async {
            Err::<FeedSnapshot, _>(FeedError::Transport("offline".to_string()))
        });

        let err = source.fetch_snapshot().await.unwrap_err();
        assert_eq!(err, FeedError::Transport("offline".to_string()));
    }
}
