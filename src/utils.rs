//!
//! Utility functions shared by the configuration and backend modules.
//!
//! - [`replace_handlebars_with_env`] - Template substitution for environment variables
//! - [`normalize_endpoint`] - Turns a collector address into a gRPC URI
//!

use {
    crate::{Error, Result},
    regex::{Captures, Regex},
    std::{env, sync::LazyLock},
    url::Url,
};

/// Matches `{{ VAR_NAME }}` with optional whitespace around an uppercase variable name.
static HANDLEBAR_REGEXP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Z0-9_]+)\s*\}\}").expect("handlebars pattern is a valid regex")
});

/// Replaces handlebars-style placeholders with environment variable values.
///
/// Searches the input for patterns like `{{ VAR_NAME }}` and replaces them
/// with the value of the corresponding environment variable. Whitespace
/// around the name is allowed, so `{{VAR}}` and `{{ VAR }}` are equivalent.
/// Unset variables are replaced with an empty string and reported with a
/// `tracing::warn!`.
///
/// # Examples
///
/// ```
/// use logging_conf::replace_handlebars_with_env;
///
/// let template = "endpoint = \"{{ MISSING_COLLECTOR_ADDR }}\"";
/// assert_eq!(replace_handlebars_with_env(template), "endpoint = \"\"");
/// ```
pub fn replace_handlebars_with_env(input: &str) -> String {
    HANDLEBAR_REGEXP
        .replace_all(input, |caps: &Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!(
                    variable = %var_name,
                    "Environment variable not found, substituting with empty string"
                );
                String::new()
            })
        })
        .to_string()
}

/// Normalizes a collector address into a URI usable by the gRPC transport.
///
/// Collector endpoints are commonly configured as bare `host:port` pairs
/// (`localhost:4317`). Those get an `http://` scheme. Addresses that already
/// carry a scheme are kept as-is, minus any trailing slash.
///
/// ```
/// use logging_conf::normalize_endpoint;
///
/// assert_eq!(normalize_endpoint("localhost:4317").unwrap(), "http://localhost:4317");
/// assert_eq!(normalize_endpoint("https://otel.example.com:4317/").unwrap(), "https://otel.example.com:4317");
/// assert!(normalize_endpoint("").is_err());
/// ```
pub fn normalize_endpoint(raw: &str) -> Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::config("OTLP endpoint must not be empty"));
    }

    let candidate = if raw.contains("://") {
        raw.trim_end_matches('/').to_string()
    } else {
        format!("http://{}", raw.trim_end_matches('/'))
    };

    let url = Url::parse(&candidate)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid_input(format!(
            "Unsupported OTLP endpoint scheme '{}' in '{raw}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::invalid_input(format!(
            "OTLP endpoint '{raw}' has no host"
        )));
    }

    Ok(candidate)
}
