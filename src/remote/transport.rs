use crate::remote::RemoteEvent;
use async_trait::async_trait;
use std::time::Duration;

/// Network capability used by the
/// [`RemoteCaptureSink`](crate::remote::RemoteCaptureSink).
///
/// `send` runs on the sink's worker runtime, bounded by the sink's timeout;
/// implementations don't need their own deadline.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one event to the error-tracking backend.
    ///
    /// **Returns**
    /// - `Ok(())` if the backend accepted the event.
    /// - `Err(..)` on connection failure or a non-success response.
    async fn send(&self, event: &RemoteEvent) -> Result<(), TransportError>;
}

/// Error type returned by a [`Transport`] or the worker driving it.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[cfg(feature = "http-transport")]
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("send timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport worker is not running")]
    Closed,

    #[error("transport queue is full")]
    QueueFull,

    #[error("remote capture called from inside its own transport")]
    Reentrant,
}
