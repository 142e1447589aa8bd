/*!
 * Synchronization Traits
 *
 * Core abstraction for the lock's wait/notify pattern.
 *
 * # Design: Predicate Waits Over a Borrowed Mutex Guard
 *
 * Every wait in the lock has the same shape: hold the bookkeeping mutex,
 * test a predicate, and if it does not hold yet, give the mutex up until
 * something changes. Strategies receive the guard so the predicate test and
 * the state update that follows happen in one critical section.
 */

use parking_lot::MutexGuard;

/// Result of a wake operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeResult {
    /// Signalled N waiters (N >= 1)
    Woken(usize),
    /// No waiters were waiting
    NoWaiters,
}

impl WakeResult {
    /// Check if any waiters were woken
    #[inline(always)]
    pub fn is_woken(&self) -> bool {
        matches!(self, WakeResult::Woken(_))
    }

    /// Get number of woken waiters (0 if none)
    #[inline(always)]
    pub fn count(&self) -> usize {
        match self {
            WakeResult::Woken(n) => *n,
            WakeResult::NoWaiters => 0,
        }
    }
}

/// The state changes a blocked caller can be waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitEvent {
    /// The writer slot became empty (writer fully released)
    WriterReleased,
    /// The reader table became empty
    ReadersDrained,
}

impl WaitEvent {
    pub(crate) const COUNT: usize = 2;

    #[inline(always)]
    pub(crate) fn index(self) -> usize {
        match self {
            WaitEvent::WriterReleased => 0,
            WaitEvent::ReadersDrained => 1,
        }
    }
}

/// Strategy for blocking until a condition over mutex-protected state clears
///
/// Implementations must be:
/// - **Thread-safe**: Safe to call from multiple threads
/// - **Lossless**: A `notify` issued after the state changed must never be
///   missed by a waiter that observed the old state
///
/// The mutex must not be held by the waiter while it is blocked.
pub trait WaitStrategy: Send + Sync {
    /// Block while `condition` returns `true`
    ///
    /// `condition` is evaluated with the mutex held; on return the mutex is
    /// held and `condition` was last observed `false`.
    fn wait_while<T, F>(&self, event: WaitEvent, guard: &mut MutexGuard<'_, T>, condition: F)
    where
        F: FnMut(&mut T) -> bool;

    /// Signal waiters of `event`
    ///
    /// Called after the state change, with or without the mutex held.
    fn notify(&self, event: WaitEvent) -> WakeResult;

    /// Get approximate count of waiters for an event (for diagnostics)
    fn waiter_count(&self, event: WaitEvent) -> usize {
        let _ = event;
        0
    }

    /// Get strategy name for debugging
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wake_result() {
        assert!(WakeResult::Woken(2).is_woken());
        assert_eq!(WakeResult::Woken(2).count(), 2);
        assert!(!WakeResult::NoWaiters.is_woken());
        assert_eq!(WakeResult::NoWaiters.count(), 0);
    }

    #[test]
    fn test_event_indices_distinct() {
        assert_ne!(
            WaitEvent::WriterReleased.index(),
            WaitEvent::ReadersDrained.index()
        );
        assert!(WaitEvent::ReadersDrained.index() < WaitEvent::COUNT);
    }
}
