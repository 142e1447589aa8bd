/*!
 * Waiter
 *
 * Strategy holder used by the lock. Selects the wait strategy from a
 * `SyncConfig`.
 *
 * # Design: Enum Dispatch for Zero-Cost Abstraction
 *
 * `WaitStrategy::wait_while` is generic over the guarded state and the
 * predicate, so the trait cannot be used as `dyn`. An enum with
 * monomorphized arms keeps the call inlinable.
 */

use super::condvar::CondvarWait;
use super::config::{StrategyType, SyncConfig};
use super::spinwait::SpinWait;
use super::traits::{WaitEvent, WaitStrategy, WakeResult};
use parking_lot::MutexGuard;

/// Wait strategy implementation (enum dispatch)
pub enum Waiter {
    Condvar(CondvarWait),
    SpinWait(SpinWait),
}

impl Waiter {
    /// Create a waiter for the given configuration
    pub fn new(config: &SyncConfig) -> Self {
        match config.select_strategy() {
            StrategyType::SpinWait => {
                Self::SpinWait(SpinWait::new(config.spin_duration, config.max_spins))
            }
            StrategyType::Condvar | StrategyType::Auto => Self::Condvar(CondvarWait::new()),
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(&SyncConfig::default())
    }
}

impl Default for Waiter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl WaitStrategy for Waiter {
    #[inline(always)]
    fn wait_while<T, F>(&self, event: WaitEvent, guard: &mut MutexGuard<'_, T>, condition: F)
    where
        F: FnMut(&mut T) -> bool,
    {
        match self {
            Self::Condvar(s) => s.wait_while(event, guard, condition),
            Self::SpinWait(s) => s.wait_while(event, guard, condition),
        }
    }

    #[inline(always)]
    fn notify(&self, event: WaitEvent) -> WakeResult {
        match self {
            Self::Condvar(s) => s.notify(event),
            Self::SpinWait(s) => s.notify(event),
        }
    }

    #[inline(always)]
    fn waiter_count(&self, event: WaitEvent) -> usize {
        match self {
            Self::Condvar(s) => s.waiter_count(event),
            Self::SpinWait(s) => s.waiter_count(event),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Condvar(s) => s.name(),
            Self::SpinWait(s) => s.name(),
        }
    }
}
