mod common;

use common::Capture;
use log_fanout::{BuildInfo, Config, Level, RemoteConfig, Resolver};
use std::path::PathBuf;
use tempfile::TempDir;

fn sink_names(logger: &log_fanout::Logger) -> Vec<String> {
    logger
        .dispatcher()
        .sinks()
        .iter()
        .map(|s| s.name().to_string())
        .collect()
}

fn in_dir(tmp: &TempDir, level: i64) -> Config {
    Config {
        build: BuildInfo {
            working_dir: tmp.path().to_path_buf(),
            ..BuildInfo::default()
        },
        level,
        output_in_file: true,
        dir: PathBuf::from("logs"),
        ..Config::default()
    }
}

#[test]
fn console_is_the_default_primary_sink() {
    let capture = Capture::default();
    let logger = Resolver::with_stderr(capture.clone())
        .resolve(&Config::default(), &RemoteConfig::default());

    assert_eq!(logger.level(), Level::Info);
    assert_eq!(sink_names(&logger), vec!["console"]);

    logger.debug("not shown", Vec::new());
    logger.info("service started", [log_fanout::attr::str("version", "1.4.0")]);

    let lines = capture.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("INF service started version=1.4.0"), "{}", lines[0]);
}

#[test]
fn each_config_level_maps_to_a_gate() {
    for (value, level) in [(2, Level::Error), (3, Level::Warn), (4, Level::Info), (5, Level::Debug)] {
        let config = Config { level: value, ..Config::default() };
        let logger = Resolver::with_stderr(Capture::default()).resolve(&config, &RemoteConfig::default());
        assert_eq!(logger.level(), level);
    }
}

#[test]
fn unmapped_level_falls_back_to_info_with_a_warning() {
    let capture = Capture::default();
    let config = Config { level: 9, ..Config::default() };
    let logger = Resolver::with_stderr(capture.clone()).resolve(&config, &RemoteConfig::default());

    assert_eq!(logger.level(), Level::Info);
    let lines = capture.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("WRN unmapped log level, using default"));
    assert!(lines[0].contains("level=9"));
}

#[test]
fn file_output_writes_json_lines_under_working_dir() {
    let tmp = TempDir::new().expect("tmp dir");
    let capture = Capture::default();
    let config = in_dir(&tmp, 5);
    let logger = Resolver::with_stderr(capture.clone()).resolve(&config, &RemoteConfig::default());

    assert_eq!(sink_names(&logger), vec!["file"]);
    logger.debug("to file", Vec::new());

    let path = tmp.path().join("logs").join("app.log");
    assert_eq!(config.log_file_path(), path);
    let text = std::fs::read_to_string(path).expect("log file");
    let value: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
    assert_eq!(value["msg"], "to file");
    assert_eq!(value["level"], "DEBUG");
    assert!(capture.contents().is_empty());
}

#[test]
fn unusable_log_dir_falls_back_to_structured_stderr() {
    let tmp = TempDir::new().expect("tmp dir");
    // A regular file where the directory should be.
    std::fs::write(tmp.path().join("logs"), b"occupied").unwrap();

    let capture = Capture::default();
    let logger = Resolver::with_stderr(capture.clone()).resolve(&in_dir(&tmp, 4), &RemoteConfig::default());

    assert_eq!(logger.level(), Level::Info);
    assert_eq!(sink_names(&logger), vec!["json-stderr"]);

    let diag = capture.lines();
    assert_eq!(diag.len(), 1);
    assert!(diag[0].contains("WRN could not open log file, using stderr"));

    logger.error("after fallback", Vec::new());
    let lines = capture.lines();
    assert_eq!(lines.len(), 2);
    let value: serde_json::Value = serde_json::from_str(&lines[1]).expect("json line");
    assert_eq!(value["msg"], "after fallback");
    assert_eq!(value["level"], "ERROR");
}

#[test]
fn remote_with_bad_dsn_is_reported_and_skipped() {
    let capture = Capture::default();
    let remote = RemoteConfig {
        enabled: true,
        dsn: "not a dsn".to_string(),
        ..RemoteConfig::default()
    };
    let logger = Resolver::with_stderr(capture.clone()).resolve(&Config::default(), &remote);

    assert_eq!(sink_names(&logger), vec!["console"]);
    let diag = capture.lines();
    assert_eq!(diag.len(), 1);
    assert!(diag[0].contains("WRN remote capture disabled"));
}

#[test]
fn disabled_remote_is_not_built() {
    let capture = Capture::default();
    let remote = RemoteConfig {
        enabled: false,
        dsn: "not a dsn".to_string(),
        ..RemoteConfig::default()
    };
    let logger = Resolver::with_stderr(capture.clone()).resolve(&Config::default(), &remote);
    assert_eq!(sink_names(&logger), vec!["console"]);
    assert!(capture.contents().is_empty());
}

#[cfg(feature = "http-transport")]
#[test]
fn remote_sink_is_added_after_primary() {
    let capture = Capture::default();
    let remote = RemoteConfig {
        enabled: true,
        dsn: "http://pubkey@127.0.0.1:9/42".to_string(),
        ..RemoteConfig::default()
    };
    let logger = Resolver::with_stderr(capture.clone()).resolve(&Config::default(), &remote);

    assert_eq!(sink_names(&logger), vec!["console", "remote"]);
    assert!(capture.contents().is_empty());
    // Info stays below the remote threshold and never touches the network.
    assert!(logger.dispatcher().sinks()[1].accepts(Level::Warn));
    assert!(!logger.dispatcher().sinks()[1].accepts(Level::Info));
}

#[test]
fn env_lookup_fills_both_sections() {
    let vars = [
        ("LOG_FANOUT_LEVEL", "3"),
        ("LOG_FANOUT_OUTPUT_IN_FILE", "true"),
        ("LOG_FANOUT_DIR", "var/log"),
        ("LOG_FANOUT_PROJECT_NAME", "billing"),
        ("LOG_FANOUT_VERSION", "2.0.1"),
        ("LOG_FANOUT_REMOTE_USE", "1"),
        ("LOG_FANOUT_REMOTE_DSN", "https://k@errors.example.com/7"),
        ("LOG_FANOUT_REMOTE_TRACES_SAMPLE_RATE", "0.5"),
    ];
    let lookup = |key: &str| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    };

    let config = Config::from_lookup(lookup);
    assert_eq!(config.level, 3);
    assert!(config.output_in_file);
    assert_eq!(config.dir, PathBuf::from("var/log"));
    assert_eq!(config.build.project_name, "billing");

    let remote = RemoteConfig::from_lookup(lookup);
    assert!(remote.enabled);
    assert_eq!(remote.dsn, "https://k@errors.example.com/7");
    assert_eq!(remote.traces_sample_rate, 0.5);
    assert_eq!(remote.build.version, "2.0.1");
}
