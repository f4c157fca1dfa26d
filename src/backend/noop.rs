use {
    super::{provider::set_global_logger_provider, resource, stdout::StdoutBackend},
    crate::{Logger, ServiceIdentity},
    opentelemetry_sdk::logs::SdkLoggerProvider,
};

/// Builds a stdout logger paired with a provider that has no processors,
/// so anything handed to it is discarded. Never touches the network.
pub(crate) fn install(identity: &ServiceIdentity, stdout: StdoutBackend) -> Logger {
    let provider = SdkLoggerProvider::builder()
        .with_resource(resource(identity))
        .build();

    set_global_logger_provider(provider.clone());
    tracing::debug!(service = %identity.name, "OpenTelemetry log export disabled");

    stdout.finish(Some(provider), false)
}
