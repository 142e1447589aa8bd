/*!
 * Lock-Based Synchronization Primitives
 *
 * - Reentrant readers-writer lock with writer priority
 * - Its bookkeeping snapshot and acquisition counters
 */

mod reentrant;
mod state;
mod stats;

// Re-export public API
pub use reentrant::ReentrantRwLock;
pub use state::LockSnapshot;
pub use stats::{LockStats, StatsSnapshot};
