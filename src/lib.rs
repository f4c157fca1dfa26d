//! # logging-conf
//!
//! Builds a ready-to-use structured logger from configuration.
//!
//! Given a service identity, an environment, a log level and an optional
//! OTLP collector, `logging-conf` picks the right output format, wires the
//! `tracing` formatting layer and, when export is enabled, an OpenTelemetry
//! log pipeline shipping every record to the collector over gRPC.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use logging_conf::{Config, Field, Log, Result, create_logger};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut config = Config::from_rust_env()?;  // Loads config/{RUST_ENV}.toml
//!     let logger = create_logger(&mut config).await?;
//!
//!     logger.info("service started", &[Field::new("port", 8080)]);
//!     logger.flush()
//! }
//! ```
//!
//! With `config/prod.toml`:
//! ```toml
//! [app]
//! name = "orders"
//! namespace = "shop"
//! environment = "production"
//! log_level = "info"
//!
//! [export]
//! enabled = true
//! endpoint = "{{ OTEL_COLLECTOR_ADDR }}"
//! ```
//!
//! Run with `RUST_ENV=prod cargo run`.
//!
//! # Output Format
//!
//! | Environment | Encoding | Level style |
//! |-------------|----------|-------------|
//! | local, development, qa, unknown | console text | colored |
//! | staging, production | JSON, one object per line | plain |
//!
//! Timestamps are RFC 3339 in both encodings. Each field is its own key:
//!
//! ```text
//! {"timestamp":"2026-10-18T09:12:44.018Z","level":"INFO","message":"processed","logger":"orders","caller":"src/orders.rs:42","request_id":"r-1","items":3}
//! ```
//!
//! Records from `error` up also carry a `stacktrace`. Exported records get
//! the same fields as typed OpenTelemetry attributes.
//!
//! # Backends
//!
//! | `export.enabled` | Backend | Network |
//! |------------------|---------|---------|
//! | `true` | stdout + batching OTLP/gRPC exporter | connects eagerly, fails fast |
//! | `false` | stdout + discarding provider | never |
//!
//! The transport opened for export is stored back into
//! `config.export.transport` so traces and metrics can share it. A
//! transport placed there beforehand is reused instead of opening a new one.
//!
//! # Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | `config` | Configuration loading and validation ([`Config`]) |
//! | `logger` | The [`Log`] contract, [`Logger`], [`MockLogger`], [`Severity`], [`Field`] |
//! | `backend` | [`LoggerFactory`], [`StdoutBackend`], [`Format`], [`Transport`] |
//! | `error` | Error types ([`Error`], [`ErrorKind`]) |
//! | `utils` | Environment substitution and endpoint normalization |
//!
//! # Fatal Records
//!
//! [`Log::fatal`] writes the record, flushes the export pipeline and exits
//! the process with status 1. Tests substitute [`RecordedExit`] through
//! [`LoggerFactory::with_exit`] to observe the call without exiting.
//!

mod backend;
mod config;
mod error;
mod logger;
mod utils;

pub use backend::*;
pub use config::*;
pub use error::*;
pub use logger::*;
pub use utils::*;

pub type Result<T> = std::result::Result<T, Error>;
