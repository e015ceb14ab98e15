use std::time::Instant;

use log_fanout::{attr, logger_debug, logger_error, Level, Logger, NoopSink};

fn main() {
    let logger = Logger::builder().level(Level::Info).sink(NoopSink).build();

    let n: i64 = 100_000;

    let start = Instant::now();
    for i in 0..n {
        logger_error!(logger, "default load test error", attr::int("iteration", i));
    }
    let elapsed = start.elapsed();
    println!(
        "enabled: dispatched {} records in {:?} (~{:.0} rec/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );

    // Below the gate: neither the message nor the attributes are built.
    let start = Instant::now();
    for i in 0..n {
        logger_debug!(logger, format!("never built {i}"), attr::int("iteration", i));
    }
    let elapsed = start.elapsed();
    println!(
        "disabled: skipped {} calls in {:?} (~{:.0} calls/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
