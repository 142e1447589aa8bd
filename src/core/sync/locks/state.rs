/*!
 * Lock Bookkeeping
 *
 * The composite state of a reentrant readers-writer lock. Writer identity,
 * writer depth, the reader table and the pending-writer counter are always
 * updated together, under the owning lock's bookkeeping mutex.
 *
 * Nothing here blocks; the transitions are pure state updates so they can be
 * exercised without threads.
 */

use crate::core::errors::{LockError, LockResult};
use crate::core::types::HolderId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of a release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Release {
    /// The caller still holds the lock (recursion depth > 0)
    Held,
    /// The writer's depth reached zero and the slot is empty
    WriterCleared,
    /// The last shared hold of any thread was released
    ReadersDrained,
    /// A shared hold was released; other readers remain
    ReaderDecremented,
}

/// Per-lock bookkeeping
#[derive(Debug, Default)]
pub(crate) struct LockState {
    /// Shared holds per thread; never stores zero
    readers: HashMap<HolderId, usize, ahash::RandomState>,
    /// Current writer (including one still draining readers)
    writer: Option<HolderId>,
    /// Writer recursion depth; > 0 iff `writer` is set
    writer_depth: usize,
    /// Writers between entering acquire_exclusive and completing it
    pending_writers: usize,
}

impl LockState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn is_writer(&self, holder: HolderId) -> bool {
        self.writer == Some(holder)
    }

    #[inline]
    pub(crate) fn has_writer(&self) -> bool {
        self.writer.is_some()
    }

    #[inline]
    pub(crate) fn has_readers(&self) -> bool {
        !self.readers.is_empty()
    }

    #[inline]
    pub(crate) fn reader_count(&self, holder: HolderId) -> usize {
        self.readers.get(&holder).copied().unwrap_or(0)
    }

    #[inline]
    pub(crate) fn writer_depth(&self) -> usize {
        self.writer_depth
    }

    /// New readers are admitted only with no writer active or pending
    #[inline]
    pub(crate) fn admits_new_reader(&self) -> bool {
        self.pending_writers == 0 && self.writer.is_none()
    }

    /// Recursive entry by the current writer (exclusive or shared)
    pub(crate) fn reenter_writer(&mut self) {
        debug_assert!(self.writer.is_some());
        self.writer_depth += 1;
    }

    pub(crate) fn add_pending_writer(&mut self) {
        self.pending_writers += 1;
    }

    pub(crate) fn remove_pending_writer(&mut self) {
        debug_assert!(self.pending_writers > 0);
        self.pending_writers = self.pending_writers.saturating_sub(1);
    }

    /// Claim the empty writer slot
    pub(crate) fn claim_writer(&mut self, holder: HolderId) {
        debug_assert!(self.writer.is_none());
        self.writer = Some(holder);
        self.writer_depth = 1;
    }

    /// Claim the writer slot only if it is empty and no readers remain
    ///
    /// Check and claim are one update, so a failed attempt leaves no trace.
    pub(crate) fn try_claim_writer(&mut self, holder: HolderId) -> bool {
        if self.writer.is_some() || !self.readers.is_empty() {
            return false;
        }
        self.claim_writer(holder);
        true
    }

    /// Add one shared hold for `holder`
    pub(crate) fn add_reader(&mut self, holder: HolderId) {
        *self.readers.entry(holder).or_insert(0) += 1;
    }

    /// Release one exclusive hold
    pub(crate) fn release_exclusive(&mut self, holder: HolderId) -> LockResult<Release> {
        match self.writer {
            None => Err(LockError::NoWriter),
            Some(writer) if writer != holder => Err(LockError::NotOwner),
            Some(_) => Ok(self.leave_writer()),
        }
    }

    /// Release one shared hold
    ///
    /// The writer's shared holds were folded into its depth, so they unwind
    /// the depth exactly like an exclusive release.
    pub(crate) fn release_shared(&mut self, holder: HolderId) -> LockResult<Release> {
        if self.is_writer(holder) {
            return Ok(self.leave_writer());
        }

        let count = self.readers.get_mut(&holder).ok_or(LockError::NotReader)?;
        *count -= 1;
        if *count > 0 {
            return Ok(Release::Held);
        }

        self.readers.remove(&holder);
        if self.readers.is_empty() {
            Ok(Release::ReadersDrained)
        } else {
            Ok(Release::ReaderDecremented)
        }
    }

    fn leave_writer(&mut self) -> Release {
        self.writer_depth -= 1;
        if self.writer_depth == 0 {
            self.writer = None;
            Release::WriterCleared
        } else {
            Release::Held
        }
    }

    /// Structural invariants that hold between any two operations
    pub(crate) fn invariants_hold(&self) -> bool {
        let writer_consistent = self.writer.is_some() == (self.writer_depth > 0);
        let no_zero_counts = self.readers.values().all(|&n| n > 0);
        writer_consistent && no_zero_counts
    }

    pub(crate) fn snapshot(&self) -> LockSnapshot {
        LockSnapshot {
            reader_threads: self.readers.len(),
            shared_holds: self.readers.values().sum(),
            writer_held: self.writer.is_some(),
            writer_depth: self.writer_depth,
            pending_writers: self.pending_writers,
        }
    }
}

/// Point-in-time view of a lock's bookkeeping (diagnostics only)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSnapshot {
    /// Distinct threads holding shared access
    pub reader_threads: usize,
    /// Total shared holds across those threads
    pub shared_holds: usize,
    /// Whether a writer owns the slot (possibly still draining readers)
    pub writer_held: bool,
    /// Writer recursion depth
    pub writer_depth: usize,
    /// Writers inside acquire_exclusive that have not completed it
    pub pending_writers: usize,
}

impl LockSnapshot {
    /// No holds of either kind
    pub fn is_unlocked(&self) -> bool {
        !self.writer_held && self.reader_threads == 0
    }
}
