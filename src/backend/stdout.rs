use {
    crate::{Exit, Format, Logger, ProcessExit, ServiceIdentity, Severity, logger::RECORD_TARGET},
    opentelemetry::logs::LoggerProvider as _,
    opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge,
    opentelemetry_sdk::logs::SdkLoggerProvider,
    std::{fmt, sync::Arc},
    tracing::Dispatch,
    tracing_subscriber::{
        Layer, Registry, filter::Targets, fmt::writer::BoxMakeWriter, layer::SubscriberExt,
    },
};

/// Crates whose own diagnostics must never be fed back into the export
/// pipeline or printed through a logger's dispatcher.
const PIPELINE_TARGETS: [&str; 5] = ["opentelemetry", "tonic", "h2", "hyper", "tower"];

///
/// Builds a logger writing to stdout.
///
/// This is also the common tail of the export backends: they hand their
/// provider to [`StdoutBackend::finish`], which gives the logger its
/// export handle and stacks the OpenTelemetry bridge next to the
/// formatting layer.
///
pub struct StdoutBackend {
    name: String,
    threshold: Severity,
    format: Format,
    writer: BoxMakeWriter,
    exit: Arc<dyn Exit>,
}

impl StdoutBackend {
    pub fn new(identity: &ServiceIdentity, threshold: Severity, format: Format) -> Self {
        Self {
            name: identity.name.clone(),
            threshold,
            format,
            writer: BoxMakeWriter::new(std::io::stdout),
            exit: Arc::new(ProcessExit),
        }
    }

    /// Replaces stdout with another sink.
    pub fn with_writer(mut self, writer: BoxMakeWriter) -> Self {
        self.writer = writer;
        self
    }

    /// Replaces the capability invoked after a fatal record.
    pub fn with_exit(mut self, exit: Arc<dyn Exit>) -> Self {
        self.exit = exit;
        self
    }

    /// Builds a stdout-only logger.
    pub fn build(self) -> Logger {
        self.finish(None, false)
    }

    ///
    /// Assembles the logger shared by every backend. When `forward` is set,
    /// each record accepted by the threshold is also emitted to `provider`,
    /// and plain `tracing` events reaching the dispatcher are forwarded
    /// through the OpenTelemetry bridge.
    ///
    pub(crate) fn finish(self, provider: Option<SdkLoggerProvider>, forward: bool) -> Logger {
        let filter = PIPELINE_TARGETS.iter().fold(
            Targets::new().with_default(self.threshold.level_filter()),
            |targets, target| targets.with_target(*target, tracing::Level::ERROR),
        );

        let forwarding = provider.as_ref().filter(|_| forward);
        let exporter = forwarding.map(|provider| provider.logger(env!("CARGO_PKG_NAME")));
        let bridge = forwarding
            .map(|provider| OpenTelemetryTracingBridge::new(provider).with_filter(bridge_filter()));

        let subscriber = Registry::default()
            .with(self.format.layer(self.writer))
            .with(bridge)
            .with(filter);

        Logger::new(
            self.name,
            self.threshold,
            Dispatch::new(subscriber),
            provider,
            exporter,
            self.exit,
        )
    }
}

/// Keeps the bridge from exporting the export pipeline's own events and
/// the logger's records, which are exported directly.
fn bridge_filter() -> Targets {
    PIPELINE_TARGETS
        .iter()
        .chain([&RECORD_TARGET])
        .fold(
            Targets::new().with_default(tracing::Level::TRACE),
            |targets, target| {
                targets.with_target(*target, tracing::level_filters::LevelFilter::OFF)
            },
        )
}

impl fmt::Debug for StdoutBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdoutBackend")
            .field("name", &self.name)
            .field("threshold", &self.threshold)
            .field("format", &self.format)
            .field("exit", &self.exit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Environment, Field, Log, RecordedExit};
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn identity(environment: Environment) -> ServiceIdentity {
        ServiceIdentity {
            name: "inventory".into(),
            namespace: String::new(),
            environment,
        }
    }

    #[test]
    fn test_build_is_stdout_only() {
        let logger = StdoutBackend::new(
            &identity(Environment::Local),
            Severity::Info,
            Format::for_environment(Environment::Local),
        )
        .build();
        assert!(logger.provider().is_none());
        assert_eq!(logger.name(), "inventory");
        assert_eq!(logger.threshold(), Severity::Info);
    }

    #[test]
    fn test_console_writer_receives_colored_records() {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let exit = RecordedExit::new();
        let logger = StdoutBackend::new(
            &identity(Environment::Development),
            Severity::Debug,
            Format::for_environment(Environment::Development),
        )
        .with_writer(BoxMakeWriter::new(move || writer.clone()))
        .with_exit(Arc::new(exit))
        .build();

        logger.debug("warming cache", &[Field::new("entries", 512)]);
        let out = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(out.contains("warming cache"));
        assert!(out.contains(r#"logger="inventory""#), "{out}");
        assert!(out.contains("entries=512"), "{out}");
        assert!(out.contains("\x1b["));
    }

    #[test]
    fn test_bridge_skips_logger_records() {
        let filter = bridge_filter();
        assert!(!filter.would_enable(RECORD_TARGET, &tracing::Level::ERROR));
        assert!(!filter.would_enable("tonic::transport", &tracing::Level::ERROR));
        assert!(filter.would_enable("app", &tracing::Level::DEBUG));
    }

    #[test]
    fn test_pipeline_targets_are_muted_below_error() {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let logger = StdoutBackend::new(
            &identity(Environment::Production),
            Severity::Debug,
            Format::for_environment(Environment::Production),
        )
        .with_writer(BoxMakeWriter::new(move || writer.clone()))
        .build();

        tracing::dispatcher::with_default(logger.dispatch(), || {
            tracing::debug!(target: "opentelemetry_sdk", "exporter chatter");
            tracing::debug!(target: "app", "application record");
        });
        let out = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(!out.contains("exporter chatter"));
        assert!(out.contains("application record"));
    }
}
