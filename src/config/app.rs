use {
    crate::{Error, Result},
    serde::Deserialize,
    std::{convert::Infallible, fmt, str::FromStr},
};

///
/// Application identity and logging policy.
///
/// ```toml
/// [app]
/// name = "orders"
/// namespace = "shop"
/// environment = "production"
/// log_level = "warn"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Service name. Names the logger and becomes the `service.name` resource attribute.
    pub name: String,

    /// Service namespace, exported as `service.namespace`.
    pub namespace: String,

    /// Deployment environment. Drives the output format.
    pub environment: Environment,

    /// Minimum severity written by the logger.
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "unknown_service".into(),
            namespace: String::new(),
            environment: Environment::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::config("app.name must not be empty"));
        }
        Ok(())
    }

    /// Returns the immutable identity attached to every record.
    pub fn identity(&self) -> ServiceIdentity {
        ServiceIdentity {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            environment: self.environment,
        }
    }
}

/// Who is logging: set once when the logger is built and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    pub name: String,
    pub namespace: String,
    pub environment: Environment,
}

///
/// Deployment environment of the process.
///
/// Parsing is case-insensitive and never fails: anything unrecognised
/// becomes [`Environment::Unknown`].
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "String")]
pub enum Environment {
    Local,
    Development,
    Qa,
    Staging,
    Production,
    #[default]
    Unknown,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Development => "development",
            Environment::Qa => "qa",
            Environment::Staging => "staging",
            Environment::Production => "production",
            Environment::Unknown => "unknown",
        }
    }
}

impl FromStr for Environment {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "local" => Environment::Local,
            "development" | "dev" | "develop" => Environment::Development,
            "qa" | "test" => Environment::Qa,
            "staging" | "stg" | "stage" => Environment::Staging,
            "production" | "prod" | "prd" => Environment::Production,
            _ => Environment::Unknown,
        })
    }
}

impl From<&str> for Environment {
    fn from(s: &str) -> Self {
        let Ok(env) = s.parse::<Environment>();
        env
    }
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        Environment::from(s.as_str())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// Log level as written in configuration.
///
/// Parsing is case-insensitive and never fails: anything unrecognised
/// becomes [`LogLevel::Unknown`], which the logger treats as `Info`.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "String")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Panic,
    Unknown,
}

impl FromStr for LogLevel {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            "panic" | "fatal" => LogLevel::Panic,
            _ => LogLevel::Unknown,
        })
    }
}

impl From<&str> for LogLevel {
    fn from(s: &str) -> Self {
        let Ok(level) = s.parse::<LogLevel>();
        level
    }
}

impl From<String> for LogLevel {
    fn from(s: String) -> Self {
        LogLevel::from(s.as_str())
    }
}
