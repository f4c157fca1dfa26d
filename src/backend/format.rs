use {
    crate::Environment,
    console::Style,
    serde_json::{Map, Value},
    std::fmt::{self as stdfmt, Write as _},
    tracing::{
        Event, Subscriber,
        field::{Field as EventField, Visit},
    },
    tracing_subscriber::{
        Layer, Registry,
        fmt::{
            self, FmtContext, FormatEvent, FormatFields,
            format::Writer,
            time::{FormatTime, SystemTime},
            writer::BoxMakeWriter,
        },
        registry::LookupSpan,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Human readable single-line text.
    Console,
    /// One JSON object per record.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStyle {
    Colored,
    Plain,
}

///
/// How records are rendered on stdout.
///
/// Timestamps are RFC 3339 in both encodings. A `Json` format is always
/// `Plain`: machine consumers never receive ANSI escapes.
///
/// Every field of a record gets its own key: a top-level JSON key, or a
/// `key=value` pair on the console line.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    pub encoding: Encoding,
    pub level_style: LevelStyle,
}

impl Format {
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Staging | Environment::Production => Self {
                encoding: Encoding::Json,
                level_style: LevelStyle::Plain,
            },
            Environment::Local
            | Environment::Development
            | Environment::Qa
            | Environment::Unknown => Self {
                encoding: Encoding::Console,
                level_style: LevelStyle::Colored,
            },
        }
    }

    /// Builds the formatting layer writing to `writer`.
    pub fn layer(self, writer: BoxMakeWriter) -> Box<dyn Layer<Registry> + Send + Sync> {
        let ansi = self.encoding == Encoding::Console && self.level_style == LevelStyle::Colored;
        let layer = fmt::layer().with_writer(writer).with_ansi(ansi);

        match self.encoding {
            Encoding::Console => layer.event_format(ConsoleRecord).boxed(),
            Encoding::Json => layer.event_format(JsonRecord).boxed(),
        }
    }
}

// ============================================================================
// Event fields
// ============================================================================

/// Keys the JSON encoding writes before the record's own fields.
const RESERVED_KEYS: [&str; 3] = ["timestamp", "level", "message"];

///
/// Collects an event into a message, an optional level label and its
/// fields in emission order.
///
/// A `fields` value holding a JSON object is spread into one entry per
/// key, `severity` overrides the level name, and `stacktrace` is kept
/// apart so the console can print it below the record line.
///
#[derive(Default)]
struct RecordVisitor {
    message: String,
    severity: Option<String>,
    stacktrace: Option<String>,
    fields: Map<String, Value>,
}

impl RecordVisitor {
    fn collect(event: &Event<'_>) -> Self {
        let mut visitor = Self::default();
        event.record(&mut visitor);
        visitor
    }

    fn insert(&mut self, key: &str, value: Value) {
        let key = if RESERVED_KEYS.contains(&key) {
            format!("fields.{key}")
        } else {
            key.to_string()
        };
        self.fields.insert(key, value);
    }

    fn level<'a>(&'a self, event: &Event<'_>) -> &'a str {
        self.severity
            .as_deref()
            .unwrap_or_else(|| event.metadata().level().as_str())
    }
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &EventField, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "severity" => self.severity = Some(value.to_string()),
            "stacktrace" => self.stacktrace = Some(value.to_string()),
            "fields" => match serde_json::from_str::<Map<String, Value>>(value) {
                Ok(object) => {
                    for (key, value) in object {
                        self.insert(&key, value);
                    }
                }
                Err(_) => self.insert("fields", Value::from(value)),
            },
            name => self.insert(name, Value::from(value)),
        }
    }

    fn record_i64(&mut self, field: &EventField, value: i64) {
        self.insert(field.name(), Value::from(value));
    }

    fn record_u64(&mut self, field: &EventField, value: u64) {
        self.insert(field.name(), Value::from(value));
    }

    fn record_f64(&mut self, field: &EventField, value: f64) {
        self.insert(field.name(), Value::from(value));
    }

    fn record_bool(&mut self, field: &EventField, value: bool) {
        self.insert(field.name(), Value::from(value));
    }

    fn record_debug(&mut self, field: &EventField, value: &dyn stdfmt::Debug) {
        let text = format!("{value:?}");
        match field.name() {
            "message" => self.message = text,
            name => self.insert(name, Value::from(text)),
        }
    }
}

fn timestamp() -> String {
    let mut text = String::new();
    // Formatting into a String cannot fail.
    let _ = SystemTime.format_time(&mut Writer::new(&mut text));
    text
}

// ============================================================================
// Encodings
// ============================================================================

/// One JSON object per line: `timestamp`, `level`, `message`, then every
/// field as a top-level key.
struct JsonRecord;

impl<S, N> FormatEvent<S, N> for JsonRecord
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> stdfmt::Result {
        let visitor = RecordVisitor::collect(event);
        let mut object = Map::new();
        object.insert("timestamp".into(), Value::from(timestamp()));
        object.insert("level".into(), Value::from(visitor.level(event)));
        object.insert("message".into(), Value::from(visitor.message.as_str()));
        object.extend(visitor.fields);
        if let Some(stacktrace) = visitor.stacktrace {
            object.insert("stacktrace".into(), Value::from(stacktrace));
        }
        writeln!(writer, "{}", Value::Object(object))
    }
}

/// `timestamp LEVEL message key=value ...`, with the stack trace, if
/// any, on the following lines.
struct ConsoleRecord;

impl ConsoleRecord {
    fn style(level: &str) -> Style {
        match level {
            "TRACE" => Style::new().magenta(),
            "DEBUG" => Style::new().blue(),
            "INFO" => Style::new().green(),
            "WARN" => Style::new().yellow(),
            "ERROR" => Style::new().red(),
            _ => Style::new().red().bold(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for ConsoleRecord
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> stdfmt::Result {
        let visitor = RecordVisitor::collect(event);
        let level = visitor.level(event);

        write!(writer, "{} ", timestamp())?;
        // The writer, not the process's terminal, decides whether to color.
        let level_style = Self::style(level).force_styling(writer.has_ansi_escapes());
        write!(writer, "{} ", level_style.apply_to(format!("{level:>5}")))?;
        writer.write_str(&visitor.message)?;

        for (key, value) in &visitor.fields {
            match value {
                Value::String(text) => write!(writer, " {key}={text:?}")?,
                other => write!(writer, " {key}={other}")?,
            }
        }
        writeln!(writer)?;

        if let Some(stacktrace) = &visitor.stacktrace {
            writeln!(writer, "{}", stacktrace.trim_end())?;
        }
        Ok(())
    }
}
