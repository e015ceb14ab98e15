use log_fanout::{attr, ConsoleSink, Level, Logger, Record, Sink, SinkError};

/// Example of integrating a completely custom destination by implementing
/// the `Sink` trait directly. Imagine this talks to some proprietary store
/// for which this crate does not provide a built-in sink.
struct MyCustomDbSink;

impl Sink for MyCustomDbSink {
    fn name(&self) -> &str {
        "my-custom-db"
    }

    fn min_level(&self) -> Level {
        Level::Warn
    }

    fn emit(&self, record: &Record) -> Result<(), SinkError> {
        // Here you would call your own client library for the target store.
        // For the sake of example we just print the record.
        println!("[my-custom-db] {} {}", record.level(), record.message());
        Ok(())
    }
}

fn main() {
    let logger = Logger::builder()
        .level(Level::Debug)
        .sink(ConsoleSink::stderr(Level::Debug))
        .sink(MyCustomDbSink)
        .build();

    logger.info("custom sink example started", [attr::str("db", "my-custom-db")]);
    logger.error_with_op(
        "simulated failure sent to the custom sink",
        Some(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into()),
        "db.save",
        [attr::int("attempt", 3)],
    );
    logger.flush();
}
