/*!
 * Adaptive Spin-Wait Strategy with Exponential Backoff
 *
 * Polls the wait condition under the bookkeeping mutex and gives the mutex
 * up between polls. Suited to critical sections that are expected to be
 * very short.
 *
 * # Design: Exponential Backoff Over Linear Spinning
 *
 * 1. **Tight spin phase**: Just `spin_loop()` hint
 * 2. **Yield phase**: `yield_now()` every iteration
 * 3. **Park phase**: Exponentially increasing sleep, capped
 *
 * The spinner never gives up; acquire operations have no timeout.
 */

use super::traits::{WaitEvent, WaitStrategy, WakeResult};
use crate::core::limits::{
    SPIN_INITIAL_BACKOFF, SPIN_MAX_BACKOFF, SPIN_TIGHT_ITERATIONS, SPIN_YIELD_ITERATIONS,
};
use parking_lot::MutexGuard;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Adaptive spin-wait strategy with exponential backoff
///
/// `notify` is a no-op apart from diagnostics: pollers observe the state
/// change on their next poll.
pub struct SpinWait {
    /// Spin duration before escalating to sleep
    spin_duration: Duration,
    /// Spin iterations before escalating to sleep
    max_spins: u32,
    waiters: [AtomicUsize; WaitEvent::COUNT],
}

impl SpinWait {
    /// Create a new adaptive spin-wait strategy
    pub fn new(spin_duration: Duration, max_spins: u32) -> Self {
        Self {
            spin_duration,
            max_spins,
            waiters: [AtomicUsize::new(0), AtomicUsize::new(0)],
        }
    }

    /// Create with default parameters (optimized for <100µs waits)
    pub fn with_defaults() -> Self {
        Self::new(Duration::from_micros(50), 500)
    }

    /// Back off once; called with the bookkeeping mutex released
    fn snooze(&self, spin_count: u32, start: Instant, backoff: &mut Duration) {
        let spinning = spin_count < self.max_spins && start.elapsed() < self.spin_duration;

        if spinning && spin_count < SPIN_TIGHT_ITERATIONS {
            std::hint::spin_loop();
        } else if spinning || spin_count < SPIN_YIELD_ITERATIONS {
            thread::yield_now();
        } else {
            thread::sleep(*backoff);
            *backoff = (*backoff * 2).min(SPIN_MAX_BACKOFF);
        }
    }
}

impl Default for SpinWait {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl WaitStrategy for SpinWait {
    fn wait_while<T, F>(&self, event: WaitEvent, guard: &mut MutexGuard<'_, T>, mut condition: F)
    where
        F: FnMut(&mut T) -> bool,
    {
        if !condition(&mut **guard) {
            return;
        }

        let waiters = &self.waiters[event.index()];
        waiters.fetch_add(1, Ordering::Relaxed);

        let start = Instant::now();
        let mut spin_count = 0u32;
        let mut backoff = SPIN_INITIAL_BACKOFF;

        loop {
            MutexGuard::unlocked(guard, || self.snooze(spin_count, start, &mut backoff));
            spin_count = spin_count.saturating_add(1);

            if !condition(&mut **guard) {
                break;
            }
        }

        waiters.fetch_sub(1, Ordering::Relaxed);
    }

    fn notify(&self, event: WaitEvent) -> WakeResult {
        match self.waiters[event.index()].load(Ordering::Relaxed) {
            0 => WakeResult::NoWaiters,
            n => WakeResult::Woken(n),
        }
    }

    fn waiter_count(&self, event: WaitEvent) -> usize {
        self.waiters[event.index()].load(Ordering::Relaxed)
    }

    fn name(&self) -> &'static str {
        "spinwait"
    }
}
