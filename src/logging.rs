//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config;

/// Install the global fmt subscriber. `RUST_LOG` overrides the default filter.
/// Calling this more than once keeps the first subscriber.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::logging::DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
