/*!
 * Structured Tracing
 * Subscriber setup for the lock's `tracing` events
 *
 * The library only emits events; installing a subscriber is left to the
 * binary (or test) that links it.
 */

use tracing::{info, span, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
    EnvFilter,
};

/// Environment variable enabling JSON log output
pub const TRACE_JSON_ENV: &str = "RRWL_TRACE_JSON";

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - RRWL_TRACE_JSON: Enable JSON output (default: false)
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing() {
    if try_init_tracing().is_ok() {
        info!("Structured tracing initialized");
    }
}

/// Initialize structured tracing, reporting whether a subscriber was
/// already installed
pub fn try_init_tracing() -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(TRACE_JSON_ENV)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        // JSON output for production/parsing
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        // Human-readable output for development
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    }
}

/// Create an info-level span for a named operation
///
/// With `FmtSpan::CLOSE` the span's busy/idle time is logged when it closes.
pub fn span_operation(operation: &str) -> Span {
    span!(Level::INFO, "operation", name = %operation)
}
