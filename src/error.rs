//! Errors raised while building a logger.
//!
//! Only construction is fallible: reading configuration, reaching the
//! collector, building the exporter, and flushing or shutting down the
//! export provider. Calls such as `info` or `warn` never report errors.
//!
//! [`Error`] is opaque. Callers branch on [`Error::kind`], while the wrapped
//! source (a `tonic` transport error, a TOML parse error, ...) stays an
//! implementation detail reachable through `std::error::Error::source`.
//!
//! ```rust
//! use logging_conf::{Error, ErrorKind};
//!
//! fn describe(err: &Error) -> &'static str {
//!     match err.kind() {
//!         ErrorKind::Transport => "collector unreachable",
//!         ErrorKind::Configuration | ErrorKind::InvalidInput => "fix the configuration",
//!         _ => "unexpected failure",
//!     }
//! }
//!
//! assert_eq!(describe(&Error::transport("connection refused")), "collector unreachable");
//! ```

use std::fmt;
use thiserror::Error;

/// Category of an [`Error`].
///
/// Marked `#[non_exhaustive]`: match with a wildcard arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Unparseable TOML, unset `RUST_ENV`, or a value failing validation.
    #[error("configuration error")]
    Configuration,

    /// A value that parsed but cannot be used, such as an endpoint with an
    /// unsupported scheme.
    #[error("invalid input")]
    InvalidInput,

    /// Reading a configuration file failed.
    #[error("I/O error")]
    Io,

    /// The gRPC connection to the collector could not be established.
    #[error("transport error")]
    Transport,

    /// Building the exporter, flushing or shutting down the provider failed.
    #[error("exporter error")]
    Exporter,

    #[error("internal error")]
    Internal,
}

impl ErrorKind {
    /// Stable identifier suitable for startup scripts and log processors.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Configuration => "CONFIG_ERROR",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::Io => "IO_ERROR",
            ErrorKind::Transport => "TRANSPORT_ERROR",
            ErrorKind::Exporter => "EXPORTER_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }
}

/// Error returned by configuration loading and logger construction.
pub struct Error {
    kind: ErrorKind,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl Error {
    /// Wraps `source` under `kind`. Strings are accepted as sources.
    ///
    /// ```rust
    /// use logging_conf::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::Exporter, "batch queue closed");
    /// assert_eq!(err.kind(), ErrorKind::Exporter);
    /// assert_eq!(err.to_string(), "batch queue closed");
    /// ```
    pub fn new<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            kind,
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Shorthand for `self.kind().code()`.
    pub fn error_code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, msg.into())
    }

    pub fn exporter(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Exporter, msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, msg.into())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("code", &self.kind.code())
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

// ============================================================================
// Conversions from dependency errors
// ============================================================================

macro_rules! error_from {
    ($($source:ty => $kind:ident),+ $(,)?) => {
        $(
            impl From<$source> for Error {
                fn from(err: $source) -> Self {
                    Self::new(ErrorKind::$kind, err)
                }
            }
        )+
    };
}

error_from! {
    std::io::Error => Io,
    std::env::VarError => Configuration,
    toml::de::Error => Configuration,
    url::ParseError => InvalidInput,
    tonic::transport::Error => Transport,
    opentelemetry_sdk::error::OTelSdkError => Exporter,
}
