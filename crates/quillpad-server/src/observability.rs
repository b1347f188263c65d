//! Tracing setup.
//!
//! The subscriber is installed once at startup with a reloadable level
//! filter: `RUST_LOG` wins when set, otherwise the given level applies, and
//! [`apply_logging_level`] swaps the filter after the config file is read.

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

static LOG_RELOAD_HANDLE: OnceLock<reload::Handle<EnvFilter, tracing_subscriber::Registry>> =
    OnceLock::new();

/// Installs the subscriber at `info` level.
pub fn init_tracing() {
    init_tracing_with_level("info");
}

/// Installs the subscriber with the given default level.
pub fn init_tracing_with_level(level: &str) {
    let base_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (reload_layer, handle) = reload::Layer::new(base_filter);
    let _ = LOG_RELOAD_HANDLE.set(handle);

    let _ = tracing_subscriber::registry()
        .with(reload_layer)
        .with(fmt::layer())
        .try_init();
}

/// Swaps the level filter at runtime. A no-op before `init_tracing` runs.
pub fn apply_logging_level(level: &str) {
    if let Some(handle) = LOG_RELOAD_HANDLE.get() {
        let _ = handle.modify(|filter| *filter = EnvFilter::new(level));
    }
}
