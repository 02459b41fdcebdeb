//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize compact human-readable logging, filtered via `RUST_LOG`.
///
/// Safe to call multiple times (subsequent calls are no-ops); tests call it
/// freely.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .compact()
        .with_target(true)
        .try_init();
}

/// Initialize JSON logging for environments that ship logs to a collector.
pub fn init_json() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .try_init();
}
