use crate::level::Level;
use crate::record::Record;
use std::io;

/// Destination for [`Record`]s handed out by the
/// [`Dispatcher`](crate::dispatch::Dispatcher).
///
/// Implementations must be safe to call from many threads at once; any
/// shared output handle is synchronized internally.
pub trait Sink: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// Lowest level this sink is interested in.
    fn min_level(&self) -> Level;

    /// Whether [`Sink::emit`] should be called for a record at `level`.
    ///
    /// Pure; the dispatcher never calls `emit` when this returns `false`.
    fn accepts(&self, level: Level) -> bool {
        level >= self.min_level()
    }

    /// Serialize and deliver a single record.
    ///
    /// **Returns**
    /// - `Ok(())` if the record was written or accepted by the backend.
    /// - `Err(..)` on write, serialization or transport failure. Failures
    ///   are returned, never panicked.
    fn emit(&self, record: &Record) -> Result<(), SinkError>;

    /// Flush any buffered output.
    ///
    /// Default implementation is a no-op.
    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Error returned by a [`Sink`].
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("write failed: {0}")]
    Io(#[from] io::Error),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("remote transport failed: {0}")]
    Transport(#[from] crate::remote::TransportError),

    #[error("sink panicked: {0}")]
    Panicked(String),
}
