use crate::attr::Attr;
use crate::level::Level;
use chrono::{DateTime, Local};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::panic::Location;

/// Timestamp layout used by the file sink.
pub const FILE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Timestamp layout used by the console sink.
pub const CONSOLE_TIME_FORMAT: &str = "%H:%M:%S";

/// One structured log event.
///
/// Built once per logging call and never mutated afterwards; sinks only get
/// `&Record`.
#[derive(Debug, Clone)]
pub struct Record {
    time: DateTime<Local>,
    level: Level,
    message: String,
    attrs: Vec<Attr>,
    source: Option<&'static Location<'static>>,
}

impl Record {
    /// Build a record stamped with the current time and the caller's location.
    #[track_caller]
    pub fn new(level: Level, message: impl Into<String>, attrs: Vec<Attr>) -> Self {
        Record {
            time: Local::now(),
            level,
            message: message.into(),
            attrs,
            source: Some(Location::caller()),
        }
    }

    /// Build a record with an explicit timestamp and no source location.
    pub fn at(time: DateTime<Local>, level: Level, message: impl Into<String>, attrs: Vec<Attr>) -> Self {
        Record {
            time,
            level,
            message: message.into(),
            attrs,
            source: None,
        }
    }

    pub fn time(&self) -> DateTime<Local> {
        self.time
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Attributes in emission order; duplicate keys are kept.
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    pub fn source(&self) -> Option<&'static Location<'static>> {
        self.source
    }

    /// First attribute with the given key.
    pub fn attr(&self, key: &str) -> Option<&Attr> {
        self.attrs.iter().find(|a| a.key() == key)
    }

    /// Serialize as one JSON object terminated by `\n`.
    ///
    /// `time_format` is a chrono format string; `None` means RFC 3339.
    pub fn to_json_line(&self, time_format: Option<&str>) -> Result<Vec<u8>, serde_json::Error> {
        let mut buf = serde_json::to_vec(&JsonRecord { record: self, time_format })?;
        buf.push(b'\n');
        Ok(buf)
    }
}

/// Serializes a record as a flat map: `time`, `level`, `msg`, then every
/// attribute in order. A `Map` would collapse duplicate keys, so entries are
/// written one by one.
struct JsonRecord<'a> {
    record: &'a Record,
    time_format: Option<&'a str>,
}

impl Serialize for JsonRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let r = self.record;
        let mut map = serializer.serialize_map(Some(3 + r.attrs.len()))?;
        match self.time_format {
            Some(fmt) => map.serialize_entry("time", &r.time.format(fmt).to_string())?,
            None => map.serialize_entry("time", &r.time.to_rfc3339())?,
        }
        map.serialize_entry("level", &r.level)?;
        map.serialize_entry("msg", &r.message)?;
        for attr in &r.attrs {
            map.serialize_entry(attr.key(), attr.value())?;
        }
        map.end()
    }
}
