use crate::level::Level;
use crate::record::Record;
use crate::sink::{Sink, SinkError};

/// A sink that accepts every level and drops all records.
///
/// Useful for measuring the overhead of the facade and dispatcher without
/// any I/O, and for tests that don't care about output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl Sink for NoopSink {
    fn name(&self) -> &str {
        "noop"
    }

    fn min_level(&self) -> Level {
        Level::Debug
    }

    fn emit(&self, _record: &Record) -> Result<(), SinkError> {
        Ok(())
    }
}
