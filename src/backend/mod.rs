//!
//! Logger backends and the factory choosing between them.
//!
//! | Backend | When | Sinks |
//! |---------|------|-------|
//! | Export | `export.enabled = true` | stdout + batching OTLP/gRPC exporter |
//! | Noop | `export.enabled = false` | stdout; export provider discards everything |
//!
//! Both backends end in [`StdoutBackend`], which owns the formatting and
//! threshold logic. [`StdoutBackend::build`] can also be used directly for
//! a logger with no export provider at all.
//!
mod format;
mod noop;
mod otlp;
mod provider;
mod stdout;
mod transport;

pub use format::*;
pub use provider::*;
pub use stdout::*;
pub use transport::*;
pub use tracing_subscriber::fmt::writer::BoxMakeWriter;

use {
    crate::{Config, Exit, ExportConfig, Logger, ProcessExit, Result, ServiceIdentity, Severity},
    opentelemetry::KeyValue,
    opentelemetry_sdk::Resource,
    opentelemetry_semantic_conventions::resource::{
        DEPLOYMENT_ENVIRONMENT_NAME, SERVICE_NAMESPACE, TELEMETRY_SDK_LANGUAGE,
    },
    std::sync::Arc,
};

/// Which backend a configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Export,
    Noop,
}

impl Backend {
    pub fn for_config(export: &ExportConfig) -> Self {
        if export.enabled {
            Backend::Export
        } else {
            Backend::Noop
        }
    }
}

///
/// Builds a [`Logger`] from a [`Config`].
///
/// ```rust,no_run
/// use logging_conf::{Config, Log, LoggerFactory};
///
/// # async fn example() -> logging_conf::Result<()> {
/// let mut config = Config::from_rust_env()?;
/// let logger = LoggerFactory::new().create(&mut config).await?;
/// logger.info("service started", &[]);
/// # Ok(())
/// # }
/// ```
///
pub struct LoggerFactory {
    writer: Option<BoxMakeWriter>,
    exit: Arc<dyn Exit>,
}

impl Default for LoggerFactory {
    fn default() -> Self {
        Self {
            writer: None,
            exit: Arc::new(ProcessExit),
        }
    }
}

impl LoggerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes records to `writer` instead of stdout.
    pub fn with_writer(mut self, writer: BoxMakeWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Replaces the capability invoked by `fatal`.
    pub fn with_exit(mut self, exit: Arc<dyn Exit>) -> Self {
        self.exit = exit;
        self
    }

    ///
    /// Validates `config` and builds the selected backend.
    ///
    /// With export enabled this connects to the collector (or reuses
    /// `config.export.transport`) and fails if the endpoint is invalid or
    /// unreachable; on success the transport is stored back into
    /// `config.export.transport`. With export disabled no connection is
    /// attempted and this cannot fail past validation.
    ///
    pub async fn create(self, config: &mut Config) -> Result<Logger> {
        config.validate()?;

        let identity = config.app.identity();
        let stdout = self.stdout_backend(&identity, config);

        match Backend::for_config(&config.export) {
            Backend::Export => otlp::install(&identity, &mut config.export, stdout).await,
            Backend::Noop => Ok(noop::install(&identity, stdout)),
        }
    }

    fn stdout_backend(self, identity: &ServiceIdentity, config: &Config) -> StdoutBackend {
        let backend = StdoutBackend::new(
            identity,
            Severity::from(config.app.log_level),
            Format::for_environment(config.app.environment),
        )
        .with_exit(self.exit);

        match self.writer {
            Some(writer) => backend.with_writer(writer),
            None => backend,
        }
    }
}

/// Shorthand for `LoggerFactory::new().create(config)`.
pub async fn create_logger(config: &mut Config) -> Result<Logger> {
    LoggerFactory::new().create(config).await
}

/// Resource attributes identifying the service on every exported record.
pub(crate) fn resource(identity: &ServiceIdentity) -> Resource {
    let environment = identity.environment.as_str();
    Resource::builder()
        .with_service_name(identity.name.clone())
        .with_attributes([
            KeyValue::new(SERVICE_NAMESPACE, identity.namespace.clone()),
            KeyValue::new("service.environment", environment),
            KeyValue::new(DEPLOYMENT_ENVIRONMENT_NAME, environment),
            KeyValue::new(TELEMETRY_SDK_LANGUAGE, "rust"),
        ])
        .build()
}
