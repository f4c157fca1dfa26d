use {
    crate::{Error, Result, Transport},
    serde::Deserialize,
    std::{sync::Arc, time::Duration},
};

///
/// Configuration for OTLP log export.
///
/// When `enabled` is false no connection is ever attempted and exported
/// records are discarded; the logger still writes to stdout.
///
/// In TOML configuration:
/// ```toml
/// [export]
/// enabled = true
/// endpoint = "localhost:4317"
/// reconnection_period = "15s"
/// timeout = "10s"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Whether records are forwarded to a collector.
    pub enabled: bool,

    /// Collector address, either `host:port` or a full `http(s)://` URI.
    pub endpoint: String,

    /// Interval of the HTTP/2 keep-alive pings used to detect a dead
    /// collector connection so the next export reconnects.
    #[serde(with = "humantime_serde")]
    pub reconnection_period: Duration,

    /// Connect timeout and per-export timeout.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Transport shared with sibling subsystems (tracing, metrics).
    /// Reused when present; filled in after a successful export setup.
    #[serde(skip)]
    pub transport: Option<Arc<Transport>>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "localhost:4317".into(),
            reconnection_period: Duration::from_secs(15),
            timeout: Duration::from_secs(10),
            transport: None,
        }
    }
}

impl ExportConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.endpoint.trim().is_empty() && self.transport.is_none() {
            return Err(Error::config(
                "export.endpoint must be set when export is enabled",
            ));
        }
        if self.timeout.is_zero() {
            return Err(Error::config("export.timeout must be greater than zero"));
        }
        // A zero keep-alive interval makes the channel ping continuously.
        if self.reconnection_period.is_zero() {
            return Err(Error::config(
                "export.reconnection_period must be greater than zero",
            ));
        }
        Ok(())
    }
}
