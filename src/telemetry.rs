//! Logging setup

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG`
///
/// Falls back to `default_filter` (e.g. `"invoice_desk=info"`) when `RUST_LOG`
/// is unset or invalid. Returns `false` if a global subscriber was already
/// installed, which makes repeated calls harmless.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
