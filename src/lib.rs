//! Structured logging facade with multi-sink dispatch.
//!
//! A [`Logger`] gates calls on one process-wide [`Level`], builds an
//! immutable [`Record`] and hands it to a [`Dispatcher`], which forwards it
//! to every [`Sink`] whose own threshold accepts it. A failing sink never
//! stops delivery to the others, and logging calls never return errors.
//!
//! ```no_run
//! use log_fanout::{attr, Config, Logger, RemoteConfig};
//!
//! let logger = Logger::from_config(&Config::default(), &RemoteConfig::default());
//! logger.info("service started", [attr::str("version", "1.4.0")]);
//! ```

pub mod attr;
pub mod level;
pub mod record;

pub mod sink;
pub mod console;
pub mod json;
pub mod file;
pub mod noop_sink;
pub mod remote;

pub mod dispatch;
pub mod logger;
mod macros;

pub mod config;
pub mod env;
pub mod global;

pub mod layer;
pub mod init;

pub use attr::{Attr, ErrorValue, Value};
pub use config::{BuildInfo, Config, RemoteConfig, Resolver};
pub use console::{ConsoleOptions, ConsoleSink};
pub use dispatch::{DispatchError, Dispatcher, SinkFailure};
pub use file::FileSink;
pub use json::JsonSink;
pub use level::Level;
pub use logger::{Logger, LoggerBuilder};
pub use noop_sink::NoopSink;
pub use record::Record;
pub use remote::RemoteCaptureSink;
pub use sink::{Sink, SinkError};
