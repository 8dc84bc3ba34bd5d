//! Feed error types.

use thiserror::Error;

/// Errors produced while fetching or decoding a feed snapshot.
///
/// All variants are transient from the poller's point of view: the failed
/// tick is logged and the next tick tries again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeedError {
    /// The request could not be sent or the body could not be read.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The body is not a valid feed document.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A feature in an otherwise valid document is unusable.
    #[error("Invalid feature #{index}: {reason}")]
    InvalidFeature { index: usize, reason: String },
}

impl FeedError {
    /// True for errors raised while reading the body rather than fetching it.
    pub fn is_decode(&self) -> bool {
        matches!(self, FeedError::Decode(_) | FeedError::InvalidFeature { .. })
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(e: serde_json::Error) -> Self {
        FeedError::Decode(e.to_string())
    }
}
