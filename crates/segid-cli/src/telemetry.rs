//! Logging setup for the CLI.
//!
//! Events go to stderr so that stdout carries nothing but IDs. Filtering
//! follows `RUST_LOG` and defaults to `info`.

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global `tracing-subscriber` formatter.
pub fn init_telemetry() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
