/*!
 * Synchronization Limits and Constants
 *
 * Centralized location for the tuning knobs of the lock's wait layer.
 *
 * ## Design Philosophy
 * - Values are grouped by concern (spin backoff, defaults)
 * - Performance-critical constants are marked with [PERF]
 */

use std::time::Duration;

// =============================================================================
// SPIN-WAIT BACKOFF
// =============================================================================

/// Iterations spent in the tight `spin_loop()` phase
/// [PERF] Covers hand-offs that complete within ~100ns
pub const SPIN_TIGHT_ITERATIONS: u32 = 10;

/// Iterations (cumulative) after which the spinner stops yielding and sleeps
/// [PERF] Between the tight phase and this bound, `yield_now()` is used
pub const SPIN_YIELD_ITERATIONS: u32 = 50;

/// Initial sleep in the park phase, doubled every iteration
pub const SPIN_INITIAL_BACKOFF: Duration = Duration::from_nanos(1);

/// Cap on a single park-phase sleep
pub const SPIN_MAX_BACKOFF: Duration = Duration::from_millis(1);

// =============================================================================
// CONFIGURATION DEFAULTS
// =============================================================================

/// Default spin duration before the spinner escalates to sleeping
pub const DEFAULT_SPIN_DURATION: Duration = Duration::from_micros(10);

/// Default spin iteration budget before the spinner escalates to sleeping
pub const DEFAULT_MAX_SPINS: u32 = 100;

/// Low-latency preset: spin duration
pub const LOW_LATENCY_SPIN_DURATION: Duration = Duration::from_micros(50);

/// Low-latency preset: iteration budget
pub const LOW_LATENCY_MAX_SPINS: u32 = 500;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_phases_ordered() {
        assert!(SPIN_TIGHT_ITERATIONS < SPIN_YIELD_ITERATIONS);
        assert!(SPIN_INITIAL_BACKOFF < SPIN_MAX_BACKOFF);
        assert!(DEFAULT_MAX_SPINS <= LOW_LATENCY_MAX_SPINS);
    }
}
