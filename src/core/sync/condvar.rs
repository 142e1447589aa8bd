/*!
 * Condvar-Based Wait Strategy
 *
 * Wait/notify over parking_lot::Condvar, one condvar per wait event.
 *
 * # Design: One Condvar Per Event
 *
 * A draining writer only cares about the reader table emptying, while
 * blocked readers and slot contenders only care about the writer leaving.
 * Splitting the events keeps a reader release from waking every blocked
 * reader, and a writer release from waking the draining writer.
 */

use super::traits::{WaitEvent, WaitStrategy, WakeResult};
use parking_lot::{Condvar, MutexGuard};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A single condvar with its waiter count
#[repr(C, align(64))] // Cache-line aligned to prevent false sharing
struct CondvarSlot {
    condvar: Condvar,
    waiters: AtomicUsize,
}

impl CondvarSlot {
    const fn new() -> Self {
        Self {
            condvar: Condvar::new(),
            waiters: AtomicUsize::new(0),
        }
    }
}

/// Condvar-based wait strategy
///
/// A `CondvarWait` must only ever be used with a single mutex (parking_lot
/// panics if one condvar is paired with two different mutexes), so every lock
/// owns its own instance.
pub struct CondvarWait {
    slots: [CondvarSlot; WaitEvent::COUNT],
}

impl CondvarWait {
    /// Create a new condvar-based wait strategy
    pub const fn new() -> Self {
        Self {
            slots: [CondvarSlot::new(), CondvarSlot::new()],
        }
    }

    #[inline]
    fn slot(&self, event: WaitEvent) -> &CondvarSlot {
        &self.slots[event.index()]
    }
}

impl Default for CondvarWait {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitStrategy for CondvarWait {
    fn wait_while<T, F>(&self, event: WaitEvent, guard: &mut MutexGuard<'_, T>, mut condition: F)
    where
        F: FnMut(&mut T) -> bool,
    {
        let slot = self.slot(event);

        while condition(&mut **guard) {
            slot.waiters.fetch_add(1, Ordering::Relaxed);
            slot.condvar.wait(guard);
            slot.waiters.fetch_sub(1, Ordering::Relaxed);
        }
    }

    fn notify(&self, event: WaitEvent) -> WakeResult {
        let slot = self.slot(event);

        if slot.waiters.load(Ordering::Relaxed) == 0 {
            return WakeResult::NoWaiters;
        }

        match slot.condvar.notify_all() {
            0 => WakeResult::NoWaiters,
            n => WakeResult::Woken(n),
        }
    }

    fn waiter_count(&self, event: WaitEvent) -> usize {
        self.slot(event).waiters.load(Ordering::Relaxed)
    }

    fn name(&self) -> &'static str {
        "condvar"
    }
}
