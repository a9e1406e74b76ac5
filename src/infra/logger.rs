// src/infra/logger.rs — Structured logging with tracing

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is unset: generation-flow events from
/// this crate, nothing from dependencies.
pub const DEFAULT_DIRECTIVE: &str = "ghostquill=info";

/// Install the global subscriber. Safe to call more than once; later
/// calls are no-ops so test binaries can initialize per-test.
pub fn init_logging(directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
