use crate::json::JsonSink;
use crate::level::Level;
use crate::record::{Record, FILE_TIME_FORMAT};
use crate::sink::{Sink, SinkError};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Name of the log file created under the configured directory.
pub const LOG_FILE_NAME: &str = "app.log";

/// Append-only structured log file at `<working_dir>/<dir>/app.log`.
///
/// Records are written as JSON lines with `YYYY-MM-DD HH:MM:SS`
/// timestamps. The file handle is shared by every caller for the lifetime
/// of the sink; appends are serialized by an internal mutex.
pub struct FileSink {
    path: PathBuf,
    inner: JsonSink<Mutex<File>>,
}

impl FileSink {
    /// Create the directory (and any missing parents) and open the log file
    /// for appending.
    ///
    /// **Returns**
    /// - `Err(..)` if the directory can not be created or the file can not
    ///   be opened. Callers are expected to fall back to another sink.
    pub fn open(working_dir: &Path, dir: &Path, min_level: Level) -> io::Result<Self> {
        let (file, path) = open_log_file(working_dir, dir, LOG_FILE_NAME)?;
        tracing::debug!(path = %path.display(), "log file opened");
        Ok(FileSink {
            path,
            inner: JsonSink::new(min_level, Mutex::new(file))
                .with_name("file")
                .with_time_format(FILE_TIME_FORMAT),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn min_level(&self) -> Level {
        self.inner.min_level()
    }

    fn emit(&self, record: &Record) -> Result<(), SinkError> {
        self.inner.emit(record)
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.inner.flush()
    }
}

/// Open `<working_dir>/<log_dir>/<file_name>` in append mode, creating the
/// directory tree and the file when missing.
pub fn open_log_file(working_dir: &Path, log_dir: &Path, file_name: &str) -> io::Result<(File, PathBuf)> {
    let full_dir = working_dir.join(log_dir);
    fs::create_dir_all(&full_dir)?;

    let path = full_dir.join(file_name);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}
