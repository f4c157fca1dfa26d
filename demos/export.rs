//! OTLP Export Example
//!
//! Ships logs to an OpenTelemetry collector listening for OTLP/gRPC.
//!
//! Start a collector, e.g.:
//! ```bash
//! docker run --rm -p 4317:4317 otel/opentelemetry-collector:latest
//! ```
//!
//! Then run with:
//! ```bash
//! OTEL_COLLECTOR_ADDR=localhost:4317 cargo run --example export
//! ```

use logging_conf::{Config, Field, Log, Result, create_logger};

#[tokio::main]
async fn main() -> Result<()> {
    let mut config: Config = r#"
[app]
name = "export-demo"
namespace = "demos"
environment = "staging"
log_level = "info"

[export]
enabled = true
endpoint = "{{ OTEL_COLLECTOR_ADDR }}"
reconnection_period = "15s"
timeout = "5s"
"#
    .parse()?;

    let logger = create_logger(&mut config).await?;

    if let Some(transport) = &config.export.transport {
        logger.info(
            "connected",
            &[Field::new("endpoint", transport.endpoint().to_string())],
        );
    }

    for order in 1..=3 {
        logger.info("order placed", &[Field::new("order", order)]);
    }

    // Shutdown flushes pending records and blocks until they are exported.
    tokio::task::spawn_blocking(move || logger.shutdown())
        .await
        .map_err(|e| logging_conf::Error::internal(e.to_string()))??;

    Ok(())
}
