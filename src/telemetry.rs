//! Tracing subscriber setup.
//!
//! Library code only emits `tracing` events; binaries call [`init_tracing`]
//! once at startup to print them.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, in `EnvFilter` syntax.
pub const LOG_FILTER_ENV: &str = "TASKBOARD_LOG";

/// Installs a global formatter that writes to stderr.
///
/// The filter comes from [`LOG_FILTER_ENV`] and falls back to
/// `default_directive` (for example `"info"` or `"taskboard=debug"`) when the
/// variable is unset or invalid. Returns `false` if a global subscriber was
/// already installed.
#[must_use]
pub fn init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
