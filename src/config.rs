//! Startup configuration and its resolution into a [`Logger`].
//!
//! Resolution never fails: every problem (unmapped level, unusable log
//! directory, bad remote settings) is reported once on a console
//! diagnostics sink and replaced by a safe default.

use crate::attr::{self, Attr};
use crate::console::{ConsoleOptions, ConsoleSink};
use crate::file::{FileSink, LOG_FILE_NAME};
use crate::json::JsonSink;
use crate::level::Level;
use crate::logger::Logger;
use crate::record::Record;
use crate::remote::{DsnError, TransportError};
use crate::sink::{Sink, SinkError};
use serde::Deserialize;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// Build metadata shared by both configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildInfo {
    pub version: String,
    pub project_name: String,
    /// Base for relative log directories. Empty means the process's
    /// current directory.
    pub working_dir: PathBuf,
}

/// Primary logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    #[serde(flatten)]
    pub build: BuildInfo,
    /// Verbose mode; the console sink appends caller locations.
    pub debug: bool,
    /// 2 = Error, 3 = Warn, 4 = Info, 5 = Debug. Anything else is Info.
    pub level: i64,
    /// Structured file output instead of the human-readable console.
    pub output_in_file: bool,
    /// Log directory, relative to `working_dir`.
    pub dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            build: BuildInfo::default(),
            debug: false,
            level: Level::DEFAULT.as_config(),
            output_in_file: false,
            dir: PathBuf::from("logs"),
        }
    }
}

impl Config {
    pub fn use_debug(&self) -> bool {
        self.debug
    }

    /// Where the file sink writes when `output_in_file` is set.
    pub fn log_file_path(&self) -> PathBuf {
        self.build.working_dir.join(&self.dir).join(LOG_FILE_NAME)
    }
}

/// Remote error-tracking settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoteConfig {
    #[serde(flatten)]
    pub build: BuildInfo,
    /// Enable the remote-capture sink.
    #[serde(rename = "use")]
    pub enabled: bool,
    pub dsn: String,
    pub environment: String,
    pub attach_stacktrace: bool,
    pub traces_sample_rate: f64,
    pub enable_tracing: bool,
    pub debug: bool,
}

impl RemoteConfig {
    pub fn use_debug(&self) -> bool {
        self.debug
    }
}

/// Error type returned when building the remote sink from configuration.
#[derive(thiserror::Error, Debug)]
pub enum RemoteBuildError {
    #[error("invalid DSN: {0}")]
    Dsn(#[from] DsnError),

    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),

    #[error("remote sink could not start: {0}")]
    Sink(#[from] SinkError),

    #[error("http-transport feature is not enabled")]
    HttpTransportDisabled,
}

/// Turns [`Config`] and [`RemoteConfig`] into sinks and a [`Logger`].
///
/// `W` is where "standard error" output goes: the diagnostics console, the
/// primary console and the structured fallback. It is only swapped out in
/// tests.
#[derive(Clone)]
pub struct Resolver<W = fn() -> io::Stderr> {
    stderr: W,
    color: bool,
}

impl Default for Resolver {
    fn default() -> Self {
        Resolver {
            stderr: io::stderr,
            color: io::stderr().is_terminal(),
        }
    }
}

impl Resolver {
    pub fn new() -> Self {
        Resolver::default()
    }
}

impl<W> Resolver<W>
where
    W: for<'a> MakeWriter<'a> + Clone + Send + Sync + 'static,
{
    /// Resolver writing all stderr output to `stderr`, without colours.
    pub fn with_stderr(stderr: W) -> Self {
        Resolver { stderr, color: false }
    }

    /// Build the logger: the primary sink (console or file), then the
    /// remote-capture sink when enabled.
    pub fn resolve(&self, config: &Config, remote: &RemoteConfig) -> Logger {
        let diagnostics: Arc<dyn Sink> = Arc::new(self.console(Level::Debug, false));

        let level = match Level::from_config(config.level) {
            Some(level) => level,
            None => {
                diagnose(
                    &*diagnostics,
                    "unmapped log level, using default",
                    vec![
                        attr::int("level", config.level),
                        attr::str("default", Level::DEFAULT.as_str()),
                    ],
                );
                Level::DEFAULT
            }
        };

        let mut builder = Logger::builder()
            .level(level)
            .diagnostics(Arc::clone(&diagnostics))
            .shared_sink(self.primary_sink(config, level, &*diagnostics));

        if remote.enabled {
            match build_remote_sink(remote) {
                Ok(sink) => builder = builder.shared_sink(sink),
                Err(err) => diagnose(
                    &*diagnostics,
                    "remote capture disabled",
                    vec![attr::err(err)],
                ),
            }
        }

        tracing::debug!(level = %level, file = config.output_in_file, remote = remote.enabled, "logger resolved");
        builder.build()
    }

    /// Console or file sink at `level`.
    ///
    /// If the log file can not be opened a warning goes to `diagnostics` and
    /// a structured stderr sink with the same threshold is returned instead.
    pub fn primary_sink(&self, config: &Config, level: Level, diagnostics: &dyn Sink) -> Arc<dyn Sink> {
        if !config.output_in_file {
            return Arc::new(self.console(level, config.use_debug()));
        }

        match FileSink::open(&config.build.working_dir, &config.dir, level) {
            Ok(sink) => Arc::new(sink),
            Err(err) => {
                diagnose(
                    diagnostics,
                    "could not open log file, using stderr",
                    vec![
                        attr::str("path", config.log_file_path().display().to_string()),
                        attr::err(err),
                    ],
                );
                Arc::new(JsonSink::new(level, self.stderr.clone()).with_name("json-stderr"))
            }
        }
    }

    fn console(&self, level: Level, debug: bool) -> ConsoleSink<W> {
        ConsoleSink::with_writer(level, self.stderr.clone()).with_options(ConsoleOptions {
            color: self.color,
            debug,
        })
    }
}

fn diagnose(diagnostics: &dyn Sink, msg: &str, attrs: Vec<Attr>) {
    let _ = diagnostics.emit(&Record::new(Level::Warn, msg, attrs));
}

/// Build the remote-capture sink with the HTTP transport.
#[cfg(feature = "http-transport")]
pub fn build_remote_sink(remote: &RemoteConfig) -> Result<Arc<dyn Sink>, RemoteBuildError> {
    use crate::remote::{Dsn, HttpTransport, RemoteCaptureSink, RemoteOptions};

    let dsn = Dsn::parse(&remote.dsn)?;
    let options = RemoteOptions::from_config(remote);
    let transport = HttpTransport::new(&dsn, options.timeout, options.debug)?;
    let sink = RemoteCaptureSink::new(Arc::new(transport), options)?;
    Ok(Arc::new(sink))
}

/// Build the remote-capture sink with the HTTP transport.
#[cfg(not(feature = "http-transport"))]
pub fn build_remote_sink(remote: &RemoteConfig) -> Result<Arc<dyn Sink>, RemoteBuildError> {
    let _ = remote;
    Err(RemoteBuildError::HttpTransportDisabled)
}

impl Logger {
    /// Resolve configuration with the default (real stderr) resolver.
    pub fn from_config(config: &Config, remote: &RemoteConfig) -> Logger {
        Resolver::new().resolve(config, remote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"level": 3, "outputInFile": true, "dir": "var/log", "projectName": "svc"}"#,
        )
        .unwrap();
        assert_eq!(config.level, 3);
        assert!(config.output_in_file);
        assert_eq!(config.dir, PathBuf::from("var/log"));
        assert_eq!(config.build.project_name, "svc");
        assert!(!config.debug);

        let empty: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn remote_use_key() {
        let remote: RemoteConfig = serde_json::from_str(
            r#"{"use": true, "dsn": "https://k@h/1", "tracesSampleRate": 0.25, "version": "1.2.0"}"#,
        )
        .unwrap();
        assert!(remote.enabled);
        assert_eq!(remote.dsn, "https://k@h/1");
        assert_eq!(remote.traces_sample_rate, 0.25);
        assert_eq!(remote.build.version, "1.2.0");
    }

    #[test]
    fn log_file_path_joins_parts() {
        let config = Config {
            build: BuildInfo {
                working_dir: PathBuf::from("/srv/app"),
                ..BuildInfo::default()
            },
            dir: PathBuf::from("logs"),
            ..Config::default()
        };
        assert_eq!(config.log_file_path(), PathBuf::from("/srv/app/logs/app.log"));
    }
}
