use log_fanout::{attr, global, Config, RemoteConfig};

fn main() {
    // LOG_FANOUT_REMOTE_DSN=https://<key>@<host>/<project> enables remote capture.
    let config = Config::from_env();
    let mut remote = RemoteConfig::from_env();
    remote.enabled = !remote.dsn.is_empty();
    remote.environment = "example".to_string();
    remote.attach_stacktrace = true;

    let logger = global::init(&config, &remote);

    logger.info("remote capture example started", [attr::bool("remote", remote.enabled)]);
    // Warn and above also go to the remote sink; at most a 3s stall each.
    logger.warn("cache miss rate high", [attr::float("rate", 0.42)]);

    let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream timed out");
    global::get().error_with_op("request failed", Some(err.into()), "http.fetch", [attr::str("url", "/v1/items")]);

    logger.flush();
}
