//! Log output for the guard binaries.
//!
//! Logs go to stderr: stdout carries the browser bridge protocol.

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "KIOSK_GUARD_LOG";

/// Build the filter from `KIOSK_GUARD_LOG`, falling back to `default_filter`,
/// then to `info` if that does not parse either.
pub fn filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(default_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
