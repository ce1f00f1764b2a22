//! Aliasable single-slot storage.

use std::sync::{Arc, Mutex};

/// A single mutable integer slot shared by reference.
///
/// Cloning a `StorageCell` shares the underlying slot rather than copying its
/// value; every clone observes every write. This aliasing is what makes the
/// borrowed-context call mode meaningful: the machine hands *its own* cell to
/// logic it did not author.
///
/// Execution is run-to-completion on one thread, but all writes still go
/// through the mutex so that a multi-threaded embedder gets the single-writer
/// discipline for free.
#[derive(Clone, Debug)]
pub struct StorageCell {
    value: Arc<Mutex<i64>>,
}

impl StorageCell {
    /// Creates a cell holding the given initial value.
    pub fn new(initial: i64) -> Self {
        Self {
            value: Arc::new(Mutex::new(initial)),
        }
    }

    /// Returns the current value. No side effects.
    pub fn read(&self) -> i64 {
        *self.value.lock().unwrap()
    }

    /// Overwrites the stored value. Never fails.
    pub fn write(&self, v: i64) {
        *self.value.lock().unwrap() = v;
    }

    /// Returns true if both handles alias the same underlying slot.
    pub fn shares_slot(&self, other: &StorageCell) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}
