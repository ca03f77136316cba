//! Structured logging initialization via `tracing`.

use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, or `default_level` when it is unset or invalid.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install a plain formatting subscriber on stderr, filtered at `info` unless
/// `RUST_LOG` says otherwise. Does nothing if a subscriber is already set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_writer(std::io::stderr)
        .try_init();
}
