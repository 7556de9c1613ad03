//! [tracing_subscriber] setup for binaries and tests that embed pipelines.
//!
//! The library only emits `tracing` events (`debug` per run, `trace` per
//! stage); installing a subscriber is left to the application.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a global fmt subscriber filtered by `filter`
///
/// `filter` uses `EnvFilter` directive syntax (e.g. `"stagepipe=trace"`). When
/// `None`, directives are read from `RUST_LOG`. Fails if a global subscriber is
/// already set.
pub fn init(filter: Option<&str>) -> Result<(), TryInitError> {
    let env_filter = filter
        .map(EnvFilter::new)
        .unwrap_or_else(EnvFilter::from_default_env);

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .try_init()
}
