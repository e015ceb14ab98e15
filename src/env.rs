//! Environment variable names used by this crate for convenient
//! configuration from services that don't load a config file.
//!
//! These are purely helpers; [`Config`] and [`RemoteConfig`] remain plain
//! structs that can be built any other way.

use crate::config::{BuildInfo, Config, RemoteConfig};
use std::path::PathBuf;
use std::str::FromStr;

/// Verbose/debug switch, `true`/`false`.
pub const LOG_FANOUT_DEBUG_ENV: &str = "LOG_FANOUT_DEBUG";

/// Integer level 2–5.
pub const LOG_FANOUT_LEVEL_ENV: &str = "LOG_FANOUT_LEVEL";

/// Write structured output to `<working dir>/<dir>/app.log`.
pub const LOG_FANOUT_OUTPUT_IN_FILE_ENV: &str = "LOG_FANOUT_OUTPUT_IN_FILE";

/// Log directory, relative to the working directory.
pub const LOG_FANOUT_DIR_ENV: &str = "LOG_FANOUT_DIR";

/// Working directory the log directory is resolved against.
pub const LOG_FANOUT_WORKING_DIR_ENV: &str = "LOG_FANOUT_WORKING_DIR";

/// Project name used in the remote release tag.
pub const LOG_FANOUT_PROJECT_NAME_ENV: &str = "LOG_FANOUT_PROJECT_NAME";

/// Version used in the remote release tag.
pub const LOG_FANOUT_VERSION_ENV: &str = "LOG_FANOUT_VERSION";

/// Enable the remote-capture sink.
pub const LOG_FANOUT_REMOTE_USE_ENV: &str = "LOG_FANOUT_REMOTE_USE";

/// Remote DSN, e.g. `https://key@errors.example.com/42`.
pub const LOG_FANOUT_REMOTE_DSN_ENV: &str = "LOG_FANOUT_REMOTE_DSN";

/// Remote environment name (`production`, `staging`, ...).
pub const LOG_FANOUT_REMOTE_ENVIRONMENT_ENV: &str = "LOG_FANOUT_REMOTE_ENVIRONMENT";

/// Attach a backtrace to remote events.
pub const LOG_FANOUT_REMOTE_ATTACH_STACKTRACE_ENV: &str = "LOG_FANOUT_REMOTE_ATTACH_STACKTRACE";

/// Traces sample rate, 0.0–1.0.
pub const LOG_FANOUT_REMOTE_TRACES_SAMPLE_RATE_ENV: &str = "LOG_FANOUT_REMOTE_TRACES_SAMPLE_RATE";

/// Enable tracing on the remote backend.
pub const LOG_FANOUT_REMOTE_ENABLE_TRACING_ENV: &str = "LOG_FANOUT_REMOTE_ENABLE_TRACING";

/// Log remote transport activity.
pub const LOG_FANOUT_REMOTE_DEBUG_ENV: &str = "LOG_FANOUT_REMOTE_DEBUG";

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn flag_or(raw: Option<String>, default: bool) -> bool {
    match raw.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off" | "") => false,
        _ => default,
    }
}

fn build_info<F>(lookup: &F) -> BuildInfo
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = BuildInfo::default();
    BuildInfo {
        version: lookup(LOG_FANOUT_VERSION_ENV).unwrap_or(defaults.version),
        project_name: lookup(LOG_FANOUT_PROJECT_NAME_ENV).unwrap_or(defaults.project_name),
        working_dir: lookup(LOG_FANOUT_WORKING_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or(defaults.working_dir),
    }
}

impl Config {
    /// Read `LOG_FANOUT_*` variables; missing or malformed values keep
    /// their defaults.
    pub fn from_env() -> Self {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Config::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        Config {
            build: build_info(&lookup),
            debug: flag_or(lookup(LOG_FANOUT_DEBUG_ENV), defaults.debug),
            level: parse_or(lookup(LOG_FANOUT_LEVEL_ENV), defaults.level),
            output_in_file: flag_or(lookup(LOG_FANOUT_OUTPUT_IN_FILE_ENV), defaults.output_in_file),
            dir: lookup(LOG_FANOUT_DIR_ENV).map(PathBuf::from).unwrap_or(defaults.dir),
        }
    }
}

impl RemoteConfig {
    /// Read `LOG_FANOUT_REMOTE_*` variables plus the shared build ones.
    pub fn from_env() -> Self {
        RemoteConfig::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RemoteConfig::default();
        RemoteConfig {
            build: build_info(&lookup),
            enabled: flag_or(lookup(LOG_FANOUT_REMOTE_USE_ENV), defaults.enabled),
            dsn: lookup(LOG_FANOUT_REMOTE_DSN_ENV).unwrap_or(defaults.dsn),
            environment: lookup(LOG_FANOUT_REMOTE_ENVIRONMENT_ENV).unwrap_or(defaults.environment),
            attach_stacktrace: flag_or(
                lookup(LOG_FANOUT_REMOTE_ATTACH_STACKTRACE_ENV),
                defaults.attach_stacktrace,
            ),
            traces_sample_rate: parse_or(
                lookup(LOG_FANOUT_REMOTE_TRACES_SAMPLE_RATE_ENV),
                defaults.traces_sample_rate,
            ),
            enable_tracing: flag_or(lookup(LOG_FANOUT_REMOTE_ENABLE_TRACING_ENV), defaults.enable_tracing),
            debug: flag_or(lookup(LOG_FANOUT_REMOTE_DEBUG_ENV), defaults.debug),
        }
    }
}
