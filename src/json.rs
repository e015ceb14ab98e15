use crate::level::Level;
use crate::record::Record;
use crate::sink::{Sink, SinkError};
use std::io::{self, Write};
use tracing_subscriber::fmt::MakeWriter;

/// Structured sink writing one JSON object per line.
///
/// Each record is serialized in full before the writer is acquired, so a
/// writer that locks (e.g. `Mutex<File>`) holds the lock only for the
/// append itself and lines never interleave.
pub struct JsonSink<W = fn() -> io::Stderr> {
    name: &'static str,
    min_level: Level,
    time_format: Option<String>,
    writer: W,
}

impl JsonSink {
    /// Structured output on standard error with RFC 3339 timestamps.
    pub fn stderr(min_level: Level) -> Self {
        JsonSink {
            name: "json-stderr",
            min_level,
            time_format: None,
            writer: io::stderr,
        }
    }
}

impl<W> JsonSink<W> {
    pub fn new(min_level: Level, writer: W) -> Self {
        JsonSink {
            name: "json",
            min_level,
            time_format: None,
            writer,
        }
    }

    /// Render `time` with a chrono format string instead of RFC 3339.
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = Some(format.into());
        self
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<W> Sink for JsonSink<W>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        self.name
    }

    fn min_level(&self) -> Level {
        self.min_level
    }

    fn emit(&self, record: &Record) -> Result<(), SinkError> {
        let line = record.to_json_line(self.time_format.as_deref())?;
        let mut out = self.writer.make_writer();
        out.write_all(&line)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.writer.make_writer().flush()?;
        Ok(())
    }
}
