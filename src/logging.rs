//! Logging setup.
//!
//! The engine logs through `tracing`; these functions install a
//! `tracing-subscriber` formatter filtered by `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber.
///
/// Reads the filter from `RUST_LOG` (default `info`), for example
/// `RUST_LOG=duty_roster=debug`.
///
/// # Example
///
/// ```no_run
/// duty_roster::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Installs a debug-level subscriber writing through the test harness.
///
/// Safe to call from several tests; only the first call installs it.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
