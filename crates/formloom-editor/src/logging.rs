//! JSON log output for hosts that do not install their own subscriber.

use tracing_subscriber::EnvFilter;

/// Install a global JSON subscriber filtered by `RUST_LOG`.
///
/// Defaults to `formloom=info` when `RUST_LOG` is unset. Fails if a global
/// subscriber is already installed.
pub fn init_json_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("formloom=info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
}
