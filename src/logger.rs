use crate::attr::{self, Attr, ErrorValue};
use crate::console::ConsoleSink;
use crate::dispatch::{DispatchError, Dispatcher};
use crate::level::Level;
use crate::record::Record;
use crate::sink::Sink;
use std::sync::Arc;

/// Public logging surface.
///
/// A `Logger` applies one process-wide minimum level and hands every record
/// that passes it to a [`Dispatcher`]. Logging calls never return errors:
/// sink failures are reported on a separate diagnostics sink and otherwise
/// swallowed.
///
/// Cloning is cheap; all clones share the same dispatcher.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

struct Inner {
    level: Level,
    dispatcher: Dispatcher,
    diagnostics: Arc<dyn Sink>,
}

impl Logger {
    /// Logger with the default stderr diagnostics sink.
    pub fn new(level: Level, dispatcher: Dispatcher) -> Self {
        Logger::builder().level(level).dispatcher(dispatcher).build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Process-wide minimum level.
    pub fn level(&self) -> Level {
        self.inner.level
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    /// Whether a call at `level` would build a record at all.
    ///
    /// False below the gate, and also when no sink accepts the level.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.inner.level && self.inner.dispatcher.accepts_any(level)
    }

    /// Build and dispatch a record if `level` passes the gate.
    ///
    /// `msg` and `attrs` are only converted once the gate has passed; use the
    /// `logger_*!` macros to also defer evaluating the attribute expressions.
    #[track_caller]
    pub fn log<I>(&self, level: Level, msg: impl Into<String>, attrs: I)
    where
        I: IntoIterator<Item = Attr>,
    {
        if !self.enabled(level) {
            return;
        }
        let record = Record::new(level, msg, attrs.into_iter().collect());
        self.dispatch(&record);
    }

    #[track_caller]
    pub fn debug<I>(&self, msg: impl Into<String>, attrs: I)
    where
        I: IntoIterator<Item = Attr>,
    {
        self.log(Level::Debug, msg, attrs);
    }

    #[track_caller]
    pub fn info<I>(&self, msg: impl Into<String>, attrs: I)
    where
        I: IntoIterator<Item = Attr>,
    {
        self.log(Level::Info, msg, attrs);
    }

    #[track_caller]
    pub fn warn<I>(&self, msg: impl Into<String>, attrs: I)
    where
        I: IntoIterator<Item = Attr>,
    {
        self.log(Level::Warn, msg, attrs);
    }

    #[track_caller]
    pub fn error<I>(&self, msg: impl Into<String>, attrs: I)
    where
        I: IntoIterator<Item = Attr>,
    {
        self.log(Level::Error, msg, attrs);
    }

    /// Log at Error with `error` and `op` attributes placed ahead of `attrs`.
    ///
    /// `error` is omitted when `err` is `None`, `op` when `op` is empty.
    #[track_caller]
    pub fn error_with_op<I>(&self, msg: impl Into<String>, err: Option<ErrorValue>, op: &str, attrs: I)
    where
        I: IntoIterator<Item = Attr>,
    {
        if !self.enabled(Level::Error) {
            return;
        }
        let attrs = attrs.into_iter();
        let mut all = Vec::with_capacity(attrs.size_hint().0 + 2);
        if let Some(err) = err {
            all.push(attr::err(err));
        }
        if !op.is_empty() {
            all.push(attr::op(op));
        }
        all.extend(attrs);
        let record = Record::new(Level::Error, msg, all);
        self.dispatch(&record);
    }

    /// Hand an already built record to the dispatcher, bypassing the gate.
    ///
    /// Failures are reported on the diagnostics sink, never back through the
    /// dispatcher.
    pub fn dispatch(&self, record: &Record) {
        if let Err(err) = self.inner.dispatcher.dispatch(record) {
            self.report(&err);
        }
    }

    /// Flush every sink; used at shutdown.
    pub fn flush(&self) {
        if let Err(err) = self.inner.dispatcher.flush() {
            self.report(&err);
        }
    }

    fn report(&self, err: &DispatchError) {
        let diagnostics = &self.inner.diagnostics;
        for failure in &err.failures {
            let record = Record::new(
                Level::Warn,
                "log sink failed",
                vec![
                    attr::str("sink", failure.sink.clone()),
                    attr::int("index", failure.index as i64),
                    attr::str("error", failure.error.to_string()),
                ],
            );
            // A failing diagnostics sink has nowhere left to report to.
            let _ = diagnostics.emit(&record);
        }
    }
}

/// Assembles a [`Logger`] from explicitly constructed sinks.
pub struct LoggerBuilder {
    level: Level,
    sinks: Vec<Arc<dyn Sink>>,
    diagnostics: Option<Arc<dyn Sink>>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            level: Level::DEFAULT,
            sinks: Vec::new(),
            diagnostics: None,
        }
    }
}

impl LoggerBuilder {
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn sink(self, sink: impl Sink + 'static) -> Self {
        self.shared_sink(Arc::new(sink))
    }

    pub fn shared_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Append every sink of an existing dispatcher, keeping their order.
    pub fn dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.sinks.extend(dispatcher.sinks().iter().cloned());
        self
    }

    /// Where sink failures are reported. Defaults to a stderr console.
    pub fn diagnostics(mut self, sink: Arc<dyn Sink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    pub fn build(self) -> Logger {
        let diagnostics = self
            .diagnostics
            .unwrap_or_else(|| Arc::new(ConsoleSink::stderr(Level::Debug)));
        Logger {
            inner: Arc::new(Inner {
                level: self.level,
                dispatcher: Dispatcher::new(self.sinks),
                diagnostics,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noop_sink::NoopSink;

    #[test]
    fn gate_and_sinks_decide_enabled() {
        let logger = Logger::builder().level(Level::Warn).sink(NoopSink).build();
        assert!(!logger.enabled(Level::Info));
        assert!(logger.enabled(Level::Warn));

        let empty = Logger::builder().level(Level::Debug).build();
        assert!(!empty.enabled(Level::Error));
    }

    #[test]
    fn builder_defaults_to_info() {
        let logger = Logger::builder().build();
        assert_eq!(logger.level(), Level::Info);
        assert!(logger.dispatcher().is_empty());
    }
}
