//! Subscriber installation for engine logs.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "SOM_LOG";

/// Filter used when no directives are given or they fail to parse.
pub const DEFAULT_FILTER: &str = "som=info";

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Parse filter directives, falling back to [`DEFAULT_FILTER`] when they are
/// missing, blank or invalid.
pub fn build_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber using `SOM_LOG`, e.g.
/// `SOM_LOG=som_engine::propagation=debug,som_engine::replicate=info`.
///
/// Returns whether the SOM subscriber is the one in place.
pub fn init_tracing() -> bool {
    let directives = std::env::var(LOG_ENV_VAR).ok();
    init_tracing_with(directives.as_deref())
}

/// Install the global subscriber with explicit directives.
///
/// Only the first call in a process does anything. If another subscriber was
/// already installed globally it is kept and this returns `false`.
pub fn init_tracing_with(directives: Option<&str>) -> bool {
    *INSTALLED.get_or_init(|| {
        let layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true);
        tracing_subscriber::registry()
            .with(layer)
            .with(build_filter(directives))
            .try_init()
            .is_ok()
    })
}
