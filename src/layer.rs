use crate::attr::{self, Attr, Value};
use crate::level::Level;
use crate::logger::Logger;
use crate::record::Record;
use chrono::Local;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Target prefix of this crate's own events; never routed back into sinks.
const SELF_TARGET: &str = "log_fanout";

/// `tracing_subscriber` layer that turns `tracing` events into
/// [`Record`]s and hands them to a [`Logger`].
///
/// The logger's level gate applies; events below it are dropped before any
/// field is visited. Fields keep their declaration order.
pub struct DispatchLayer {
    logger: Logger,
}

impl DispatchLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl<S> Layer<S> for DispatchLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if meta.target().starts_with(SELF_TARGET) {
            return;
        }

        let level = Level::from(*meta.level());
        if !self.logger.enabled(level) {
            return;
        }

        let mut attrs = Vec::new();
        let mut message = None;
        event.record(&mut FieldVisitor {
            attrs: &mut attrs,
            message: &mut message,
        });

        // The event's call site is not a `Location`; leave the source unset.
        let record = Record::at(Local::now(), level, message.unwrap_or_default(), attrs);
        self.logger.dispatch(&record);
    }
}

/// Collects event fields into ordered attributes.
pub struct FieldVisitor<'a> {
    pub attrs: &'a mut Vec<Attr>,
    pub message: &'a mut Option<String>,
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.attrs.push(attr::str(field.name(), value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.attrs.push(Attr::new(field.name(), value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.attrs.push(Attr::new(field.name(), value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.attrs.push(Attr::new(field.name(), value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.attrs.push(Attr::new(field.name(), value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.attrs.push(Attr::new(field.name(), Value::Str(value.to_string())));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{value:?}"));
        } else {
            self.attrs.push(attr::str(field.name(), format!("{value:?}")));
        }
    }
}
