mod common;

use async_trait::async_trait;
use common::{journal, Capture, Recording};
use log_fanout::init::init_tracing;
use log_fanout::remote::{RemoteEvent, RemoteOptions, Transport, TransportError};
use log_fanout::{ConsoleSink, Level, Logger, RemoteCaptureSink};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Transport whose client library logs through `tracing` while sending.
#[derive(Default)]
struct Chatty {
    sends: AtomicUsize,
}

#[async_trait]
impl Transport for Chatty {
    async fn send(&self, _event: &RemoteEvent) -> Result<(), TransportError> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        tracing::warn!(target: "http_client", "slow upstream");
        Ok(())
    }
}

// Installs the global subscriber, so it is the only test in this binary.
#[test]
fn transport_logging_does_not_feed_back_into_remote() {
    let log = journal();
    let capture = Capture::default();
    let transport = Arc::new(Chatty::default());
    let remote = RemoteCaptureSink::new(
        transport.clone(),
        RemoteOptions::default().with_timeout(Duration::from_millis(500)),
    )
    .unwrap();
    let logger = Logger::builder()
        .level(Level::Debug)
        .sink(Recording::new("local", Level::Debug, &log))
        .sink(remote)
        .diagnostics(Arc::new(ConsoleSink::with_writer(Level::Debug, capture.clone())))
        .build();
    init_tracing(logger.clone()).unwrap();

    logger.error("boom", Vec::new());

    // The send succeeded and nothing was reported.
    assert!(capture.contents().is_empty(), "{}", capture.contents());

    std::thread::sleep(Duration::from_millis(1500));
    assert_eq!(transport.sends.load(Ordering::SeqCst), 1);
    // The transport's own warning still reached the local sink.
    assert_eq!(*log.lock().unwrap(), vec!["local:boom", "local:slow upstream"]);
    assert!(capture.contents().is_empty());
}
