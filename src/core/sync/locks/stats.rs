/*!
 * Lock Statistics
 * Relaxed atomic counters, read without touching the bookkeeping mutex
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Acquisition counters for one lock
#[derive(Debug, Default)]
pub struct LockStats {
    shared_acquired: AtomicU64,
    exclusive_acquired: AtomicU64,
    recursive_acquired: AtomicU64,
    contended_waits: AtomicU64,
    try_failures: AtomicU64,
}

/// Plain copy of `LockStats` for reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub shared_acquired: u64,
    pub exclusive_acquired: u64,
    /// Acquisitions satisfied by an existing hold of the same thread
    pub recursive_acquired: u64,
    /// Acquisitions that had to block at least once
    pub contended_waits: u64,
    pub try_failures: u64,
}

impl LockStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub(crate) fn record_shared(&self) {
        self.shared_acquired.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn record_exclusive(&self) {
        self.exclusive_acquired.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn record_recursive(&self) {
        self.recursive_acquired.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn record_contended(&self) {
        self.contended_waits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn record_try_failure(&self) {
        self.try_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            shared_acquired: self.shared_acquired.load(Ordering::Relaxed),
            exclusive_acquired: self.exclusive_acquired.load(Ordering::Relaxed),
            recursive_acquired: self.recursive_acquired.load(Ordering::Relaxed),
            contended_waits: self.contended_waits.load(Ordering::Relaxed),
            try_failures: self.try_failures.load(Ordering::Relaxed),
        }
    }
}
