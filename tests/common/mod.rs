#![allow(dead_code)]

use log_fanout::{Level, Record, Sink, SinkError};
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// In-memory stand-in for standard error.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Capture {
    type Writer = Capture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Shared log of `<sink>:<message>` entries, in call order.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

/// Sink that records every emit into a journal.
pub struct Recording {
    pub name: &'static str,
    pub min_level: Level,
    pub journal: Journal,
    pub emits: AtomicUsize,
}

impl Recording {
    pub fn new(name: &'static str, min_level: Level, journal: &Journal) -> Self {
        Recording {
            name,
            min_level,
            journal: Arc::clone(journal),
            emits: AtomicUsize::new(0),
        }
    }

    pub fn emits(&self) -> usize {
        self.emits.load(Ordering::SeqCst)
    }
}

impl Sink for Recording {
    fn name(&self) -> &str {
        self.name
    }

    fn min_level(&self) -> Level {
        self.min_level
    }

    fn emit(&self, record: &Record) -> Result<(), SinkError> {
        self.emits.fetch_add(1, Ordering::SeqCst);
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, record.message()));
        Ok(())
    }
}

/// Sink whose every emit fails.
pub struct Failing {
    pub journal: Journal,
    pub calls: AtomicUsize,
}

impl Failing {
    pub fn new(journal: &Journal) -> Self {
        Failing {
            journal: Arc::clone(journal),
            calls: AtomicUsize::new(0),
        }
    }
}

impl Sink for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn min_level(&self) -> Level {
        Level::Debug
    }

    fn emit(&self, record: &Record) -> Result<(), SinkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.journal
            .lock()
            .unwrap()
            .push(format!("failing:{}", record.message()));
        Err(SinkError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed")))
    }
}

pub const ALL_LEVELS: [Level; 4] = [Level::Debug, Level::Info, Level::Warn, Level::Error];
