use {opentelemetry_sdk::logs::SdkLoggerProvider, std::sync::OnceLock};

static LOGGER_PROVIDER: OnceLock<SdkLoggerProvider> = OnceLock::new();

///
/// Registers `provider` as the process-wide log provider.
///
/// Only the first registration takes effect; re-initialization is not
/// supported. Returns `false` and logs a warning, leaving the registered
/// provider in place, when one is already set.
///
pub fn set_global_logger_provider(provider: SdkLoggerProvider) -> bool {
    let installed = LOGGER_PROVIDER.set(provider).is_ok();
    if !installed {
        tracing::warn!("Global logger provider already registered, keeping the existing one");
    }
    installed
}

/// The provider registered by the first logger built in this process.
pub fn global_logger_provider() -> Option<&'static SdkLoggerProvider> {
    LOGGER_PROVIDER.get()
}
