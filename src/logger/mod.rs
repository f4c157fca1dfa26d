//!
//! The logging handle returned by the factory and the capability contract
//! it satisfies.
//!
//! [`Logger`] is cheap to clone. Every clone shares the same subscriber,
//! export provider and exit capability; [`Log::with`] creates a child that
//! additionally carries a set of context fields.
//!
//! ```rust
//! use logging_conf::{Environment, Field, Format, Log, Severity, StdoutBackend, Config};
//!
//! let config = Config::default().with_name("orders");
//! let identity = config.app.identity();
//! let logger = StdoutBackend::new(&identity, Severity::Info, Format::for_environment(Environment::Local))
//!     .build();
//!
//! let request = logger.with([Field::new("request_id", "r-42")]);
//! request.info("order accepted", &[Field::new("items", 3)]);
//! request.debug("filtered out", &[]);
//! ```
//!
mod exit;
mod field;
mod mock;
mod severity;

pub use exit::*;
pub use field::*;
pub use mock::*;
pub use severity::*;

use {
    crate::{Error, Result},
    opentelemetry::logs::{AnyValue, LogRecord as _, Logger as _},
    opentelemetry_sdk::logs::{SdkLogger, SdkLoggerProvider},
    std::{backtrace::Backtrace, fmt, panic::Location, sync::Arc, time::SystemTime},
    tracing::{Dispatch, dispatcher},
};

/// `tracing` target of the records written by a [`Logger`].
pub(crate) const RECORD_TARGET: &str = "logging_conf::record";

///
/// The logging capability handed to application code.
///
/// Logging calls never fail. The only call with a side effect beyond writing
/// a record is [`Log::fatal`], which terminates the process after the record
/// has been emitted and flushed.
///
/// Every call is `#[track_caller]`: the `caller` stamped on a record is the
/// application line that logged it, not a line inside this crate.
///
pub trait Log {
    /// Returns a child logger carrying `fields` on every record in addition
    /// to the fields already attached to `self`.
    fn with<I>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = Field>,
        Self: Sized;

    /// Emits a record at `severity`. A `Fatal` record is written but does not
    /// terminate; use [`Log::fatal`] for that.
    #[track_caller]
    fn log(&self, severity: Severity, message: &str, fields: &[Field]);

    #[track_caller]
    fn debug(&self, message: &str, fields: &[Field]) {
        self.log(Severity::Debug, message, fields);
    }

    #[track_caller]
    fn info(&self, message: &str, fields: &[Field]) {
        self.log(Severity::Info, message, fields);
    }

    #[track_caller]
    fn warn(&self, message: &str, fields: &[Field]) {
        self.log(Severity::Warn, message, fields);
    }

    #[track_caller]
    fn error(&self, message: &str, fields: &[Field]) {
        self.log(Severity::Error, message, fields);
    }

    /// Emits a fatal record, then terminates the process with exit code 1.
    #[track_caller]
    fn fatal(&self, message: &str, fields: &[Field]);
}

///
/// Logger produced by [`crate::LoggerFactory`] and the backend builders.
///
/// Each record is written to stdout through a private `tracing` dispatcher
/// and, when exporting, handed to the OpenTelemetry provider as a log record
/// with one typed attribute per field. The dispatcher is not installed
/// globally unless [`Logger::install_global`] is called.
///
/// Records carry `logger` (the service name), `caller` (`file:line` of the
/// logging call) and, from `Error` up, a `stacktrace`.
///
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
    fields: Arc<[Field]>,
}

struct LoggerInner {
    name: String,
    threshold: Severity,
    dispatch: Dispatch,
    provider: Option<SdkLoggerProvider>,
    exporter: Option<SdkLogger>,
    exit: Arc<dyn Exit>,
}

/// One accepted logging call, shared by both sinks.
struct Record<'a> {
    severity: Severity,
    message: &'a str,
    caller: String,
    fields: FieldList<'a>,
    stacktrace: Option<String>,
}

impl Logger {
    pub(crate) fn new(
        name: String,
        threshold: Severity,
        dispatch: Dispatch,
        provider: Option<SdkLoggerProvider>,
        exporter: Option<SdkLogger>,
        exit: Arc<dyn Exit>,
    ) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                name,
                threshold,
                dispatch,
                provider,
                exporter,
                exit,
            }),
            fields: Arc::from(Vec::new()),
        }
    }

    /// Service name stamped on every record as `logger`.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn threshold(&self) -> Severity {
        self.inner.threshold
    }

    /// Whether a record at `severity` would be written.
    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.inner.threshold
    }

    /// Context fields accumulated through [`Log::with`].
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The dispatcher records are written through.
    pub fn dispatch(&self) -> &Dispatch {
        &self.inner.dispatch
    }

    /// The export provider, present for the export and no-op export backends.
    pub fn provider(&self) -> Option<&SdkLoggerProvider> {
        self.inner.provider.as_ref()
    }

    /// Whether records are handed to the export provider.
    pub fn exporting(&self) -> bool {
        self.inner.exporter.is_some()
    }

    ///
    /// Installs this logger's dispatcher as the process-wide `tracing`
    /// default so plain `tracing::info!` calls reach the same stdout sink
    /// and, when exporting, the collector through the OpenTelemetry bridge.
    /// Fails when a global default is already set.
    ///
    pub fn install_global(&self) -> Result<()> {
        dispatcher::set_global_default(self.inner.dispatch.clone())
            .map_err(|e| Error::internal(format!("Failed to install global dispatcher: {e}")))
    }

    /// Exports every buffered record. A no-op without an export provider.
    ///
    /// Blocks until the batch processor has handed the records to the
    /// exporter, which itself needs the Tokio runtime to make progress. From
    /// async code, call it through `tokio::task::spawn_blocking`.
    pub fn flush(&self) -> Result<()> {
        match &self.inner.provider {
            Some(provider) => Ok(provider.force_flush()?),
            None => Ok(()),
        }
    }

    /// Flushes and stops the export provider. Records logged afterwards are
    /// still written to stdout but no longer exported.
    pub fn shutdown(&self) -> Result<()> {
        match &self.inner.provider {
            Some(provider) => Ok(provider.shutdown()?),
            None => Ok(()),
        }
    }

    #[track_caller]
    fn emit(&self, severity: Severity, message: &str, fields: &[Field]) {
        if !self.enabled(severity) {
            return;
        }

        let location = Location::caller();
        let record = Record {
            severity,
            message,
            caller: format!("{}:{}", location.file(), location.line()),
            fields: FieldList {
                context: &self.fields,
                call: fields,
            },
            stacktrace: (severity >= Severity::Error)
                .then(|| Backtrace::force_capture().to_string()),
        };

        self.write(&record);
        if let Some(exporter) = &self.inner.exporter {
            self.export(exporter, &record);
        }
    }

    fn write(&self, record: &Record<'_>) {
        let message = record.message;
        let logger = self.inner.name.as_str();
        let caller = record.caller.as_str();
        let fields = record.fields.to_json();
        let fields = fields.as_deref();
        let stacktrace = record.stacktrace.as_deref();

        dispatcher::with_default(&self.inner.dispatch, || match record.severity {
            Severity::Debug => {
                tracing::debug!(target: RECORD_TARGET, logger, caller, fields, "{message}")
            }
            Severity::Info => {
                tracing::info!(target: RECORD_TARGET, logger, caller, fields, "{message}")
            }
            Severity::Warn => {
                tracing::warn!(target: RECORD_TARGET, logger, caller, fields, "{message}")
            }
            Severity::Error => tracing::error!(
                target: RECORD_TARGET,
                logger,
                caller,
                fields,
                stacktrace,
                "{message}"
            ),
            Severity::Fatal => tracing::error!(
                target: RECORD_TARGET,
                severity = Severity::Fatal.label(),
                logger,
                caller,
                fields,
                stacktrace,
                "{message}"
            ),
        });
    }

    fn export(&self, exporter: &SdkLogger, record: &Record<'_>) {
        let now = SystemTime::now();
        let mut log = exporter.create_log_record();
        log.set_timestamp(now);
        log.set_observed_timestamp(now);
        log.set_severity_number(record.severity.otel_severity());
        log.set_severity_text(record.severity.label());
        log.set_body(AnyValue::from(record.message.to_string()));
        log.add_attribute("logger", self.inner.name.clone());
        log.add_attribute("caller", record.caller.clone());
        for field in record.fields.iter() {
            log.add_attribute(field.otel_key(), field.value().to_any_value());
        }
        if let Some(stacktrace) = &record.stacktrace {
            log.add_attribute("stacktrace", stacktrace.clone());
        }
        exporter.emit(log);
    }
}

impl Log for Logger {
    fn with<I>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = Field>,
    {
        Self {
            inner: Arc::clone(&self.inner),
            fields: self.fields.iter().cloned().chain(fields).collect(),
        }
    }

    fn log(&self, severity: Severity, message: &str, fields: &[Field]) {
        self.emit(severity, message, fields);
    }

    fn fatal(&self, message: &str, fields: &[Field]) {
        self.emit(Severity::Fatal, message, fields);
        // Best effort: the process is going away either way.
        let _ = self.flush();
        self.inner.exit.exit(1);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.inner.name)
            .field("threshold", &self.inner.threshold)
            .field("exporting", &self.exporting())
            .field("fields", &self.fields)
            .finish()
    }
}
