//!
//! Configuration structures for building a logger.
//!
//! A configuration can be created in many ways:
//! - From an environment-specific TOML file via `Config::from_rust_env` or `Config::from_toml_file`
//! - From a TOML string via `Config::from_toml` or `str::parse`
//! - Constructed programmatically via the builder methods on `Config`
//!
//! In both TOML-based methods, environment variables can be referenced in the TOML
//! using the {{ VAR_NAME }} syntax, and they will be substituted with the corresponding
//! environment variable value. This is done via the `replace_handlebars_with_env`
//! function and keeps deployment-specific values such as collector addresses out of
//! the TOML files.
//!
//! Configuration is split into two sections:
//!
//! - `AppConfig` for the service identity, environment and log level
//! - `ExportConfig` for OTLP log export
//!
mod app;
mod export;

pub use app::*;
pub use export::*;

use {
    crate::{Error, Result, Transport, utils::replace_handlebars_with_env},
    serde::Deserialize,
    std::{env, fs, str::FromStr, sync::Arc, time::Duration},
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    ///
    /// Loads the configuration from a file based on the RUST_ENV environment variable.
    /// Fails when RUST_ENV is not set or the file does not exist.
    ///
    pub fn from_rust_env() -> Result<Config> {
        Self::from_toml_file(env::var("RUST_ENV")?)
    }

    ///
    /// Given an environment name, loads the corresponding configuration file,
    /// substitutes any environment variables, and returns a Config struct.
    /// The configuration file is expected to be located at "config/{env}.toml"
    /// where {env} is the provided environment name (e.g., "dev", "prod").
    ///
    pub fn from_toml_file(env: impl AsRef<str>) -> Result<Config> {
        let path = format!("config/{}.toml", env.as_ref());
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    ///
    /// Parses a configuration string in TOML format into a Config struct.
    ///
    pub fn from_toml(toml_str: &str) -> Result<Config> {
        toml_str.parse()
    }

    /// Sets the service name of the AppConfig.
    pub fn with_name(mut self, name: &str) -> Self {
        self.app.name = name.into();
        self
    }

    /// Sets the service namespace of the AppConfig.
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.app.namespace = namespace.into();
        self
    }

    /// Sets the deployment environment of the AppConfig.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.app.environment = environment;
        self
    }

    /// Sets the log level of the AppConfig.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.app.log_level = level;
        self
    }

    /// Enables OTLP export towards the given collector endpoint.
    pub fn with_export_endpoint(mut self, endpoint: &str) -> Self {
        self.export.enabled = true;
        self.export.endpoint = endpoint.into();
        self
    }

    /// Enables or disables OTLP export without touching the endpoint.
    pub fn with_export_enabled(mut self, enabled: bool) -> Self {
        self.export.enabled = enabled;
        self
    }

    /// Sets the connect and export timeout of the ExportConfig.
    pub fn with_export_timeout(mut self, timeout: Duration) -> Self {
        self.export.timeout = timeout;
        self
    }

    /// Sets the keep-alive interval used to detect broken collector connections.
    pub fn with_reconnection_period(mut self, period: Duration) -> Self {
        self.export.reconnection_period = period;
        self
    }

    /// Provides an already established transport to share with other subsystems.
    pub fn with_transport(mut self, transport: Arc<Transport>) -> Self {
        self.export.transport = Some(transport);
        self
    }

    /// Ensures that the configuration is valid.
    /// Most values have sensible defaults; the service name is required and
    /// an enabled export needs somewhere to send records.
    pub fn validate(&self) -> Result<()> {
        self.app.validate()?;
        self.export.validate()?;
        Ok(())
    }
}

///
/// Parses a configuration string with references to environment variables
/// into a Config struct by substituting the environment variables and then
/// parsing the resulting TOML.
///
impl FromStr for Config {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let config_file = replace_handlebars_with_env(s);
        let config = toml::from_str::<Config>(&config_file)?;
        Ok(config)
    }
}
