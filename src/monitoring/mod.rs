/*!
 * Monitoring
 * Structured logging setup for binaries and tests
 */

mod tracer;

pub use tracer::{init_tracing, span_operation, try_init_tracing};
