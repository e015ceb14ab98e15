use crate::level::Level;
use crate::record::Record;
use crate::sink::{Sink, SinkError};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Fans a record out to an ordered set of sinks.
///
/// Built once before any logging happens and never resized afterwards.
/// `dispatch` takes `&self` and may be called from any number of threads;
/// each sink synchronizes its own output.
#[derive(Clone, Default)]
pub struct Dispatcher {
    sinks: Vec<Arc<dyn Sink>>,
}

impl Dispatcher {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Dispatcher { sinks }
    }

    pub fn sinks(&self) -> &[Arc<dyn Sink>] {
        &self.sinks
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Whether at least one sink would accept a record at `level`.
    pub fn accepts_any(&self, level: Level) -> bool {
        self.sinks.iter().any(|s| s.accepts(level))
    }

    /// Deliver `record` to every accepting sink, in configured order.
    ///
    /// A failing (or panicking) sink never stops delivery to the sinks after
    /// it; all failures are collected into the returned [`DispatchError`].
    pub fn dispatch(&self, record: &Record) -> Result<(), DispatchError> {
        let mut failures = Vec::new();
        for (index, sink) in self.sinks.iter().enumerate() {
            if !sink.accepts(record.level()) {
                continue;
            }
            if let Err(error) = guarded(|| sink.emit(record)) {
                failures.push(SinkFailure {
                    index,
                    sink: sink.name().to_string(),
                    error,
                });
            }
        }
        DispatchError::check(failures)
    }

    /// Flush every sink, with the same isolation as [`Dispatcher::dispatch`].
    pub fn flush(&self) -> Result<(), DispatchError> {
        let mut failures = Vec::new();
        for (index, sink) in self.sinks.iter().enumerate() {
            if let Err(error) = guarded(|| sink.flush()) {
                failures.push(SinkFailure {
                    index,
                    sink: sink.name().to_string(),
                    error,
                });
            }
        }
        DispatchError::check(failures)
    }
}

fn guarded<F>(f: F) -> Result<(), SinkError>
where
    F: FnOnce() -> Result<(), SinkError>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(SinkError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// One sink's failure during a dispatch or flush.
#[derive(thiserror::Error, Debug)]
#[error("sink #{index} ({sink}) failed: {error}")]
pub struct SinkFailure {
    /// Position of the sink in the dispatcher.
    pub index: usize,
    pub sink: String,
    #[source]
    pub error: SinkError,
}

/// Failures collected while fanning out a single record.
#[derive(thiserror::Error, Debug)]
#[error("{} sink(s) failed", .failures.len())]
pub struct DispatchError {
    pub failures: Vec<SinkFailure>,
}

impl DispatchError {
    fn check(failures: Vec<SinkFailure>) -> Result<(), DispatchError> {
        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError { failures })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noop_sink::NoopSink;

    struct Exploding;

    impl Sink for Exploding {
        fn name(&self) -> &str {
            "exploding"
        }

        fn min_level(&self) -> Level {
            Level::Debug
        }

        fn emit(&self, _record: &Record) -> Result<(), SinkError> {
            panic!("boom");
        }
    }

    #[test]
    fn empty_dispatcher_is_ok() {
        let d = Dispatcher::default();
        assert!(d.is_empty());
        assert!(!d.accepts_any(Level::Error));
        assert!(d.dispatch(&Record::new(Level::Error, "x", Vec::new())).is_ok());
    }

    #[test]
    fn panics_are_reported_as_failures() {
        let d = Dispatcher::new(vec![Arc::new(Exploding), Arc::new(NoopSink)]);
        let err = d
            .dispatch(&Record::new(Level::Info, "x", Vec::new()))
            .unwrap_err();
        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].index, 0);
        assert_eq!(err.failures[0].sink, "exploding");
        assert!(matches!(&err.failures[0].error, SinkError::Panicked(m) if m == "boom"));
    }
}
