use crate::attr::Value;
use crate::level::Level;
use crate::record::{Record, CONSOLE_TIME_FORMAT};
use crate::sink::{Sink, SinkError};
use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};
use tracing_subscriber::fmt::MakeWriter;

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[91m";
const GREEN: &str = "\x1b[92m";
const YELLOW: &str = "\x1b[93m";
const BLUE: &str = "\x1b[94m";

/// Rendering switches for [`ConsoleSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleOptions {
    /// Emit ANSI colour codes.
    pub color: bool,
    /// Append the caller's `file:line` to every line.
    pub debug: bool,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            color: io::stderr().is_terminal(),
            debug: false,
        }
    }
}

/// Human-readable sink, one line per record:
///
/// ```text
/// 14:03:07 WRN cache miss key=user:42 op=db.load
/// ```
///
/// Output goes to any [`MakeWriter`]; the default is standard error. Each
/// line is assembled in memory and written with a single `write_all`.
pub struct ConsoleSink<W = fn() -> io::Stderr> {
    min_level: Level,
    options: ConsoleOptions,
    writer: W,
}

impl ConsoleSink {
    pub fn stderr(min_level: Level) -> Self {
        ConsoleSink {
            min_level,
            options: ConsoleOptions::default(),
            writer: io::stderr,
        }
    }
}

impl<W> ConsoleSink<W> {
    /// Console sink writing to a custom target, colours off.
    pub fn with_writer(min_level: Level, writer: W) -> Self {
        ConsoleSink {
            min_level,
            options: ConsoleOptions { color: false, debug: false },
            writer,
        }
    }

    pub fn with_options(mut self, options: ConsoleOptions) -> Self {
        self.options = options;
        self
    }

    /// Render a record the way [`Sink::emit`] writes it, newline included.
    pub fn render(&self, record: &Record) -> String {
        let color = self.options.color;
        let mut line = String::with_capacity(64 + record.message().len());

        let time = record.time().format(CONSOLE_TIME_FORMAT);
        if color {
            let _ = write!(line, "{DIM}{time}{RESET} ");
        } else {
            let _ = write!(line, "{time} ");
        }

        let tag = record.level().short();
        if color {
            let code = match record.level() {
                Level::Debug => BLUE,
                Level::Info => GREEN,
                Level::Warn => YELLOW,
                Level::Error => RED,
            };
            let _ = write!(line, "{code}{tag}{RESET} ");
        } else {
            let _ = write!(line, "{tag} ");
        }

        line.push_str(record.message());

        for attr in record.attrs() {
            let rendered = render_value(attr.value());
            match (color, attr.value()) {
                (true, Value::Error(_)) => {
                    let _ = write!(line, " {RED}{}={rendered}{RESET}", attr.key());
                }
                (true, _) => {
                    let _ = write!(line, " {DIM}{}={RESET}{rendered}", attr.key());
                }
                (false, _) => {
                    let _ = write!(line, " {}={rendered}", attr.key());
                }
            }
        }

        if self.options.debug {
            if let Some(loc) = record.source() {
                if color {
                    let _ = write!(line, " {DIM}source={}:{}{RESET}", loc.file(), loc.line());
                } else {
                    let _ = write!(line, " source={}:{}", loc.file(), loc.line());
                }
            }
        }

        line.push('\n');
        line
    }
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '"' || c == '=')
}

fn quote_if_needed(s: String) -> String {
    if needs_quoting(&s) {
        format!("{s:?}")
    } else {
        s
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Str(s) => quote_if_needed(s.clone()),
        Value::Error(e) => quote_if_needed(e.to_string()),
        other => other.to_string(),
    }
}

impl<W> Sink for ConsoleSink<W>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        "console"
    }

    fn min_level(&self) -> Level {
        self.min_level
    }

    fn emit(&self, record: &Record) -> Result<(), SinkError> {
        let line = self.render(record);
        let mut out = self.writer.make_writer();
        out.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.writer.make_writer().flush()?;
        Ok(())
    }
}
