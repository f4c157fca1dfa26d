use {
    crate::{Error, ExportConfig, Result, utils::normalize_endpoint},
    tonic::transport::{Channel, Endpoint},
};

///
/// A gRPC connection to an OTLP collector.
///
/// Connected once and shared through [`ExportConfig::transport`] so that
/// logs, traces and metrics of a process can ride the same HTTP/2
/// connection. Cloning the inner [`Channel`] is cheap; every clone
/// multiplexes over the same connection.
///
#[derive(Debug)]
pub struct Transport {
    endpoint: String,
    channel: Channel,
}

impl Transport {
    ///
    /// Connects to `export.endpoint` and waits until the connection is up.
    ///
    /// The connect timeout and the per-request timeout are both
    /// `export.timeout`; `export.reconnection_period` becomes the HTTP/2
    /// keep-alive interval so a dead collector is noticed and the next
    /// export reconnects.
    ///
    pub async fn connect(export: &ExportConfig) -> Result<Self> {
        let endpoint = normalize_endpoint(&export.endpoint)?;
        let channel = Endpoint::from_shared(endpoint.clone())
            .map_err(|e| Error::invalid_input(format!("Invalid OTLP endpoint '{endpoint}': {e}")))?
            .connect_timeout(export.timeout)
            .timeout(export.timeout)
            .http2_keep_alive_interval(export.reconnection_period)
            .keep_alive_timeout(export.timeout)
            .keep_alive_while_idle(true);

        let channel = tokio::time::timeout(export.timeout, channel.connect())
            .await
            .map_err(|_| {
                Error::transport(format!(
                    "Timed out after {} connecting to OTLP collector at {endpoint}",
                    humantime::format_duration(export.timeout)
                ))
            })??;

        tracing::debug!(endpoint = %endpoint, "Connected to OTLP collector");
        Ok(Self { endpoint, channel })
    }

    /// Wraps a channel established elsewhere.
    pub fn from_channel(endpoint: impl Into<String>, channel: Channel) -> Self {
        Self {
            endpoint: endpoint.into(),
            channel,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn channel(&self) -> Channel {
        self.channel.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use std::time::Duration;

    fn export(endpoint: &str) -> ExportConfig {
        ExportConfig {
            enabled: true,
            endpoint: endpoint.into(),
            timeout: Duration::from_millis(500),
            ..ExportConfig::default()
        }
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_endpoint() {
        let err = Transport::connect(&export("ftp://collector:4317"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_connect_fails_when_nothing_listens() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = Transport::connect(&export(&addr.to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_from_channel_keeps_endpoint() {
        let channel = Endpoint::from_static("http://127.0.0.1:4317").connect_lazy();
        let transport = Transport::from_channel("http://127.0.0.1:4317", channel);
        assert_eq!(transport.endpoint(), "http://127.0.0.1:4317");
    }
}
