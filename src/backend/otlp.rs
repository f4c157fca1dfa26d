use {
    super::{provider::set_global_logger_provider, resource, stdout::StdoutBackend},
    crate::{Error, ExportConfig, Logger, Result, ServiceIdentity, Transport},
    opentelemetry_otlp::{Compression, LogExporter, WithExportConfig, WithTonicConfig},
    opentelemetry_sdk::logs::{BatchLogProcessor, SdkLoggerProvider},
    std::sync::Arc,
};

///
/// Builds a logger that writes to stdout and forwards every record to an
/// OTLP collector through a batching exporter.
///
/// The transport in `export.transport` is reused when present, otherwise a
/// new connection is established. On success the transport is written back
/// into `export` for sibling subsystems. On failure nothing is registered
/// and `export` is left untouched.
///
pub(crate) async fn install(
    identity: &ServiceIdentity,
    export: &mut ExportConfig,
    stdout: StdoutBackend,
) -> Result<Logger> {
    let transport = match &export.transport {
        Some(transport) => {
            tracing::debug!(endpoint = %transport.endpoint(), "Reusing shared OTLP transport");
            Arc::clone(transport)
        }
        None => Arc::new(Transport::connect(export).await?),
    };

    let exporter = LogExporter::builder()
        .with_tonic()
        .with_channel(transport.channel())
        .with_compression(Compression::Gzip)
        .with_timeout(export.timeout)
        .build()
        .map_err(|e| Error::exporter(format!("Failed to create OTLP log exporter: {e}")))?;

    let provider = SdkLoggerProvider::builder()
        .with_resource(resource(identity))
        .with_log_processor(BatchLogProcessor::builder(exporter).build())
        .build();

    set_global_logger_provider(provider.clone());

    tracing::info!(
        endpoint = %transport.endpoint(),
        service = %identity.name,
        environment = %identity.environment,
        "OpenTelemetry log export initialized"
    );

    export.transport = Some(transport);
    Ok(stdout.finish(Some(provider), true))
}
