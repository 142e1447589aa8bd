/*!
 * Pending Transaction Overlay
 *
 * A thread's uncommitted writes. A key is either updated, deleted, or
 * untouched; setting a key cancels its pending delete and vice versa.
 */

use ahash::{AHashMap, AHashSet};

/// What the overlay says about a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookup<'a> {
    Updated(&'a str),
    Deleted,
    Untouched,
}

/// Uncommitted writes of one thread
#[derive(Debug, Default)]
pub(crate) struct PendingOps {
    updated: AHashMap<String, String>,
    deleted: AHashSet<String>,
}

impl PendingOps {
    pub(crate) fn set(&mut self, key: String, value: String) {
        self.deleted.remove(&key);
        self.updated.insert(key, value);
    }

    pub(crate) fn delete(&mut self, key: String) {
        self.updated.remove(&key);
        self.deleted.insert(key);
    }

    pub(crate) fn lookup(&self, key: &str) -> Lookup<'_> {
        if let Some(value) = self.updated.get(key) {
            Lookup::Updated(value)
        } else if self.deleted.contains(key) {
            Lookup::Deleted
        } else {
            Lookup::Untouched
        }
    }

    pub(crate) fn updated(&self) -> impl Iterator<Item = (&str, &str)> {
        self.updated.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn deleted(&self) -> impl Iterator<Item = &str> {
        self.deleted.iter().map(String::as_str)
    }

    /// Number of keys touched
    pub(crate) fn len(&self) -> usize {
        self.updated.len() + self.deleted.len()
    }

    pub(crate) fn into_parts(self) -> (AHashMap<String, String>, AHashSet<String>) {
        (self.updated, self.deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_delete_leaves_only_delete() {
        let mut ops = PendingOps::default();
        ops.set("k".into(), "v".into());
        ops.delete("k".into());

        assert_eq!(ops.lookup("k"), Lookup::Deleted);
        assert_eq!(ops.len(), 1);
    }

    #[test]
    fn test_delete_then_set_leaves_only_update() {
        let mut ops = PendingOps::default();
        ops.delete("k".into());
        ops.set("k".into(), "v".into());

        assert_eq!(ops.lookup("k"), Lookup::Updated("v"));
        assert_eq!(ops.deleted().count(), 0);
        assert_eq!(ops.lookup("other"), Lookup::Untouched);
    }
}
