/*!
 * Reentrant Readers-Writer Lock
 *
 * Multiple concurrent readers or one exclusive writer, where a holder may
 * re-acquire a compatible mode without deadlocking on itself, and where a
 * waiting writer blocks new readers.
 *
 * # Design: One Bookkeeping Mutex, Two Wait Events
 *
 * Writer identity, writer depth, the reader table and the pending-writer
 * counter live in a single `LockState` behind a short-held mutex. It is held
 * for O(1) updates only; blocked callers give it up through the `Waiter`.
 *
 * - Slot contenders and new readers wait for `WriterReleased`
 * - A writer holding the slot waits for `ReadersDrained`
 *
 * # Recursion
 *
 * - The writer may call `acquire_exclusive` or `acquire_shared` again; both
 *   fold into the writer depth and need one release each
 * - A reader may call `acquire_shared` again even while a writer is pending;
 *   that writer is waiting for this reader to drain
 * - Upgrading shared to exclusive is NOT supported and deadlocks
 */

use super::state::{LockSnapshot, LockState, Release};
use super::stats::{LockStats, StatsSnapshot};
use crate::core::errors::LockResult;
use crate::core::guard::{ExclusiveGuard, SharedGuard};
use crate::core::sync::config::SyncConfig;
use crate::core::sync::traits::{WaitEvent, WaitStrategy};
use crate::core::sync::wait::Waiter;
use crate::core::types::current_holder;
use parking_lot::Mutex;
use std::fmt;
use tracing::{debug, trace, warn};

/// Reentrant (recursive) readers-writer lock with writer priority
///
/// The lock guards no data of its own; it orders the callers that share
/// some other resource. Use the raw operations in matched pairs, or the
/// RAII guards from [`read`](Self::read) and [`write`](Self::write).
///
/// # Example
///
/// ```
/// use reentrant_rwlock::ReentrantRwLock;
///
/// let lock = ReentrantRwLock::new();
///
/// lock.acquire_exclusive();
/// lock.acquire_shared(); // same thread, folds into the write depth
/// assert_eq!(lock.write_depth_current_thread(), 2);
///
/// lock.release_shared().unwrap();
/// lock.release_exclusive().unwrap();
/// assert!(!lock.is_locked());
/// ```
pub struct ReentrantRwLock {
    state: Mutex<LockState>,
    waiter: Waiter,
    stats: LockStats,
}

impl ReentrantRwLock {
    /// Create an unlocked lock with the default wait strategy
    pub fn new() -> Self {
        Self::with_config(SyncConfig::default())
    }

    /// Create an unlocked lock with the given wait configuration
    pub fn with_config(config: SyncConfig) -> Self {
        Self {
            state: Mutex::new(LockState::new()),
            waiter: Waiter::new(&config),
            stats: LockStats::new(),
        }
    }

    /// Create a lock that polls with backoff instead of parking
    pub fn low_latency() -> Self {
        Self::with_config(SyncConfig::low_latency())
    }

    /// Acquire exclusive access, blocking until it is granted
    ///
    /// Raises the pending-writer count first, which stops new readers; then
    /// claims the writer slot once empty and waits for readers already
    /// admitted to finish. The pending count drops when this call returns.
    pub fn acquire_exclusive(&self) {
        let me = current_holder();
        let mut state = self.state.lock();

        if state.is_writer(me) {
            state.reenter_writer();
            self.stats.record_recursive();
            trace!(thread = ?me, depth = state.writer_depth(), "exclusive re-entered");
            return;
        }

        if state.reader_count(me) > 0 {
            warn!(
                thread = ?me,
                shared_holds = state.reader_count(me),
                "acquire_exclusive while holding shared access; this upgrade cannot complete"
            );
        }

        state.add_pending_writer();

        let mut contended = false;
        if state.has_writer() {
            contended = true;
            debug!(thread = ?me, "waiting for writer slot");
            self.waiter
                .wait_while(WaitEvent::WriterReleased, &mut state, |s| s.has_writer());
        }

        state.claim_writer(me);

        if state.has_readers() {
            contended = true;
            debug!(thread = ?me, "writer slot claimed, draining readers");
            self.waiter
                .wait_while(WaitEvent::ReadersDrained, &mut state, |s| s.has_readers());
        }

        state.remove_pending_writer();
        debug_assert!(state.invariants_hold());
        drop(state);

        self.stats.record_exclusive();
        if contended {
            self.stats.record_contended();
        }
        trace!(thread = ?me, "exclusive acquired");
    }

    /// Try to acquire exclusive access without blocking
    ///
    /// Succeeds for the current writer (one more depth level), or when the
    /// writer slot is empty and no readers hold the lock. A failed attempt
    /// leaves the lock untouched.
    pub fn try_acquire_exclusive(&self) -> bool {
        let me = current_holder();
        let mut state = self.state.lock();

        if state.is_writer(me) {
            state.reenter_writer();
            self.stats.record_recursive();
            return true;
        }

        if state.try_claim_writer(me) {
            drop(state);
            self.stats.record_exclusive();
            trace!(thread = ?me, "exclusive acquired (try)");
            true
        } else {
            drop(state);
            self.stats.record_try_failure();
            false
        }
    }

    /// Release one level of exclusive access
    ///
    /// # Errors
    ///
    /// `LockError::NoWriter` if no writer holds the lock,
    /// `LockError::NotOwner` if the caller is not the writer.
    pub fn release_exclusive(&self) -> LockResult<()> {
        let me = current_holder();
        let released = self.state.lock().release_exclusive(me);

        match released {
            Ok(release) => {
                self.after_release(release);
                trace!(thread = ?me, ?release, "exclusive released");
                Ok(())
            }
            Err(e) => {
                warn!(thread = ?me, error = %e, "unmatched exclusive release");
                Err(e)
            }
        }
    }

    /// Acquire shared access, blocking until it is granted
    ///
    /// Blocks while a writer holds the lock or is pending, unless the caller
    /// already holds shared or exclusive access.
    pub fn acquire_shared(&self) {
        let me = current_holder();
        let mut state = self.state.lock();

        if state.is_writer(me) {
            state.reenter_writer();
            self.stats.record_recursive();
            trace!(thread = ?me, depth = state.writer_depth(), "shared folded into write depth");
            return;
        }

        if state.reader_count(me) > 0 {
            state.add_reader(me);
            self.stats.record_recursive();
            trace!(thread = ?me, holds = state.reader_count(me), "shared re-entered");
            return;
        }

        let contended = !state.admits_new_reader();
        if contended {
            debug!(thread = ?me, "waiting for writers to finish");
            self.waiter.wait_while(WaitEvent::WriterReleased, &mut state, |s| {
                !s.admits_new_reader()
            });
        }

        // Still under the mutex: no writer can claim the slot between the
        // predicate check and this increment.
        state.add_reader(me);
        drop(state);

        self.stats.record_shared();
        if contended {
            self.stats.record_contended();
        }
        trace!(thread = ?me, "shared acquired");
    }

    /// Try to acquire shared access without blocking
    pub fn try_acquire_shared(&self) -> bool {
        let me = current_holder();
        let mut state = self.state.lock();

        if state.is_writer(me) {
            state.reenter_writer();
            self.stats.record_recursive();
            return true;
        }

        if state.reader_count(me) > 0 {
            state.add_reader(me);
            self.stats.record_recursive();
            return true;
        }

        if state.admits_new_reader() {
            state.add_reader(me);
            drop(state);
            self.stats.record_shared();
            true
        } else {
            drop(state);
            self.stats.record_try_failure();
            false
        }
    }

    /// Release one level of shared access
    ///
    /// For the writer this unwinds one level of the write depth.
    ///
    /// # Errors
    ///
    /// `LockError::NotReader` if the caller holds neither shared nor
    /// exclusive access.
    pub fn release_shared(&self) -> LockResult<()> {
        let me = current_holder();
        let released = self.state.lock().release_shared(me);

        match released {
            Ok(release) => {
                self.after_release(release);
                trace!(thread = ?me, ?release, "shared released");
                Ok(())
            }
            Err(e) => {
                warn!(thread = ?me, error = %e, "unmatched shared release");
                Err(e)
            }
        }
    }

    /// Wake whoever waits on the state change a release produced
    #[inline]
    fn after_release(&self, release: Release) {
        match release {
            Release::WriterCleared => {
                self.waiter.notify(WaitEvent::WriterReleased);
            }
            Release::ReadersDrained => {
                self.waiter.notify(WaitEvent::ReadersDrained);
            }
            Release::Held | Release::ReaderDecremented => {}
        }
    }

    /// Acquire shared access as an RAII guard
    pub fn read(&self) -> SharedGuard<'_> {
        self.acquire_shared();
        SharedGuard::new(self)
    }

    /// Acquire exclusive access as an RAII guard
    pub fn write(&self) -> ExclusiveGuard<'_> {
        self.acquire_exclusive();
        ExclusiveGuard::new(self)
    }

    /// Non-blocking [`read`](Self::read)
    pub fn try_read(&self) -> Option<SharedGuard<'_>> {
        self.try_acquire_shared().then(|| SharedGuard::new(self))
    }

    /// Non-blocking [`write`](Self::write)
    pub fn try_write(&self) -> Option<ExclusiveGuard<'_>> {
        self.try_acquire_exclusive().then(|| ExclusiveGuard::new(self))
    }

    /// Whether any thread holds or is claiming the lock
    pub fn is_locked(&self) -> bool {
        let state = self.state.lock();
        state.has_writer() || state.has_readers()
    }

    /// Whether a writer owns the slot
    pub fn is_write_locked(&self) -> bool {
        self.state.lock().has_writer()
    }

    /// Whether the calling thread is the writer
    pub fn is_write_locked_by_current_thread(&self) -> bool {
        self.state.lock().is_writer(current_holder())
    }

    /// Write depth of the calling thread (0 if it is not the writer)
    pub fn write_depth_current_thread(&self) -> usize {
        let state = self.state.lock();
        if state.is_writer(current_holder()) {
            state.writer_depth()
        } else {
            0
        }
    }

    /// Shared holds of the calling thread (the writer's are in its depth)
    pub fn read_count_current_thread(&self) -> usize {
        self.state.lock().reader_count(current_holder())
    }

    /// Point-in-time view of the bookkeeping
    pub fn snapshot(&self) -> LockSnapshot {
        self.state.lock().snapshot()
    }

    /// Acquisition counters
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Threads currently blocked on the lock, as reported by the strategy
    pub fn blocked_count(&self) -> usize {
        self.waiter.waiter_count(WaitEvent::WriterReleased)
            + self.waiter.waiter_count(WaitEvent::ReadersDrained)
    }

    /// Name of the active wait strategy
    pub fn strategy_name(&self) -> &'static str {
        self.waiter.name()
    }
}

impl Default for ReentrantRwLock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ReentrantRwLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReentrantRwLock")
            .field("state", &self.snapshot())
            .field("strategy", &self.strategy_name())
            .finish()
    }
}
