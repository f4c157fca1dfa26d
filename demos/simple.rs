//! Simple Example
//!
//! Stdout logging with export disabled. Switch `environment` to
//! `production` to see the JSON encoding.
//!
//! Run with:
//! ```bash
//! cargo run --example simple
//! ```

use logging_conf::{Config, Field, Log, Result, create_logger};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // In production, use Config::from_rust_env() to load from config/{RUST_ENV}.toml
    let mut config: Config = r#"
[app]
name = "simple-demo"
namespace = "demos"
environment = "development"
log_level = "debug"
"#
    .parse()?;

    let logger = create_logger(&mut config).await?;

    logger.debug("loading catalog", &[]);
    logger.info(
        "catalog loaded",
        &[
            Field::new("items", 1240),
            Field::new("elapsed", Duration::from_millis(87)),
        ],
    );

    let request = logger.with([Field::new("request_id", "0192f4c1")]);
    request.warn("slow query", &[Field::new("table", "orders")]);

    let err = std::io::Error::other("connection reset by peer");
    request.error("upstream failed", &[Field::error(&err)]);

    Ok(())
}
