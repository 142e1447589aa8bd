/*!
 * Core Types
 * Thread identity used as the key of the lock's recursion bookkeeping
 */

use std::thread::{self, ThreadId};

/// Identity of a lock holder
///
/// `ThreadId` is unique for the life of the process and never reused, so it
/// stays stable across any held critical section.
pub type HolderId = ThreadId;

/// Identity of the calling thread
#[inline]
pub fn current_holder() -> HolderId {
    thread::current().id()
}
