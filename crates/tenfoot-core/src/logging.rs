#![forbid(unsafe_code)]

//! Structured logging setup.
//!
//! The engine itself only emits `tracing` events and spans; hosts that
//! already install a subscriber need nothing from this module. Standalone
//! hosts (the web shell, integration rigs) can enable the `logging` feature
//! for a `RUST_LOG`-filtered formatter, or `tracing-json` for JSON lines.

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,tenfoot_focus=debug,tenfoot_runtime=debug";

/// Install a human-readable subscriber. Returns false if one was already set.
#[cfg(feature = "logging")]
pub fn init_logging() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Install a subscriber that writes through the libtest capture.
///
/// Safe to call from every test; only the first call installs.
#[cfg(feature = "logging")]
pub fn init_test_logging() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Install a JSON-lines subscriber. Returns false if one was already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init()
        .is_ok()
}
