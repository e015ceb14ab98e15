//! Remote-capture sink: forwards Warn and Error records to an external
//! error-tracking backend.
//!
//! The sink is synchronous from the caller's point of view. Delivery runs on
//! a dedicated worker thread and every send is bounded by
//! [`SEND_TIMEOUT`], so a hung endpoint stalls the logging call for at most
//! that long.

pub mod dsn;
#[cfg(feature = "http-transport")]
pub mod http;
pub mod transport;
mod worker;

pub use dsn::{Dsn, DsnError};
#[cfg(feature = "http-transport")]
pub use http::HttpTransport;
pub use transport::{Transport, TransportError};

use crate::attr::{Value, OP_KEY};
use crate::config::RemoteConfig;
use crate::level::Level;
use crate::record::Record;
use crate::sink::{Sink, SinkError};
use chrono::Utc;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::backtrace::Backtrace;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use worker::TransportWorker;

/// Upper bound on a single remote send.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(3);

/// Settings passed through to the remote backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteOptions {
    pub environment: Option<String>,
    /// `<project>@<version>`.
    pub release: Option<String>,
    /// Capture a backtrace at the logging call and attach it to the event.
    pub attach_stacktrace: bool,
    /// Kept within `0.0..=1.0`. Carried for the backend; no trace data is
    /// produced by this crate.
    pub traces_sample_rate: f64,
    pub enable_tracing: bool,
    /// Log transport activity through `tracing`.
    pub debug: bool,
    pub timeout: Duration,
}

impl Default for RemoteOptions {
    fn default() -> Self {
        Self {
            environment: None,
            release: None,
            attach_stacktrace: false,
            traces_sample_rate: 0.0,
            enable_tracing: false,
            debug: false,
            timeout: SEND_TIMEOUT,
        }
    }
}

impl RemoteOptions {
    pub fn from_config(config: &RemoteConfig) -> Self {
        let build = &config.build;
        let release = if build.project_name.is_empty() && build.version.is_empty() {
            None
        } else {
            Some(format!("{}@{}", build.project_name, build.version))
        };
        let environment = if config.environment.is_empty() {
            None
        } else {
            Some(config.environment.clone())
        };
        let traces_sample_rate = if config.traces_sample_rate.is_nan() {
            0.0
        } else {
            config.traces_sample_rate.clamp(0.0, 1.0)
        };

        RemoteOptions {
            environment,
            release,
            attach_stacktrace: config.attach_stacktrace,
            traces_sample_rate,
            enable_tracing: config.enable_tracing,
            debug: config.use_debug(),
            timeout: SEND_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Owned, serializable form of a record as sent to the backend.
#[derive(Debug, Clone, Serialize)]
pub struct RemoteEvent {
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub level: &'static str,
    pub logger: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    /// Record attributes, in order, duplicates kept.
    #[serde(serialize_with = "serialize_pairs")]
    pub extra: Vec<(String, serde_json::Value)>,
    /// `file:line` of the logging call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub culprit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<String>,
}

fn serialize_pairs<S: Serializer>(pairs: &[(String, serde_json::Value)], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (key, value) in pairs {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

fn remote_level(level: Level) -> &'static str {
    match level {
        Level::Debug => "debug",
        Level::Info => "info",
        Level::Warn => "warning",
        Level::Error => "error",
    }
}

/// Sink forwarding records at [`Level::Warn`] and above through a
/// [`Transport`].
///
/// Send failures and timeouts come back from `emit` as
/// [`SinkError::Transport`]; the dispatcher isolates them from other sinks.
pub struct RemoteCaptureSink {
    options: RemoteOptions,
    worker: TransportWorker,
}

impl RemoteCaptureSink {
    pub const MIN_LEVEL: Level = Level::Warn;

    /// Start the delivery worker for `transport`.
    ///
    /// **Returns**
    /// - `Err(..)` if the worker runtime or thread can not be created.
    pub fn new(transport: Arc<dyn Transport>, options: RemoteOptions) -> Result<Self, SinkError> {
        let worker = TransportWorker::spawn(transport, options.timeout)?;
        tracing::debug!(timeout = ?worker.timeout(), "remote capture sink started");
        Ok(Self { options, worker })
    }

    pub fn options(&self) -> &RemoteOptions {
        &self.options
    }

    /// Convert a record into the event that would be sent.
    pub fn event(&self, record: &Record) -> RemoteEvent {
        let mut tags = BTreeMap::new();
        if let Some(attr) = record.attr(OP_KEY) {
            if let Value::Str(op) = attr.value() {
                tags.insert(OP_KEY.to_string(), op.clone());
            }
        }

        let extra = record
            .attrs()
            .iter()
            .map(|a| (a.key().to_string(), a.value().to_json()))
            .collect();

        RemoteEvent {
            timestamp: record.time().with_timezone(&Utc).to_rfc3339(),
            level: remote_level(record.level()),
            logger: env!("CARGO_PKG_NAME"),
            message: record.message().to_string(),
            environment: self.options.environment.clone(),
            release: self.options.release.clone(),
            tags,
            extra,
            culprit: record
                .source()
                .map(|loc| format!("{}:{}", loc.file(), loc.line())),
            stacktrace: self
                .options
                .attach_stacktrace
                .then(|| Backtrace::force_capture().to_string()),
        }
    }
}

impl Sink for RemoteCaptureSink {
    fn name(&self) -> &str {
        "remote"
    }

    fn min_level(&self) -> Level {
        Self::MIN_LEVEL
    }

    /// Never accepts on a worker thread: records logged while a transport
    /// is sending go to the other sinks only.
    fn accepts(&self, level: Level) -> bool {
        level >= Self::MIN_LEVEL && !worker::on_worker_thread()
    }

    fn emit(&self, record: &Record) -> Result<(), SinkError> {
        let event = self.event(record);
        self.worker.send(event)?;
        Ok(())
    }
}
