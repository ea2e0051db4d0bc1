use lazy_static::lazy_static;
use std::cmp::Ordering;
use std::sync::{Mutex, MutexGuard};

// Count the number of drop calls of `Tracked` values.
// Tests run in parallel, so every `Tracked` must be created and dropped
// inside `count_drops`, which serializes them
lazy_static! {
    static ref NUM_DROPPED: Mutex<usize> = Mutex::new(0);
    static ref DROP_MUTEX: Mutex<()> = Mutex::new(());
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A failed test must not poison the others
    mutex.lock().unwrap_or_else(|err| err.into_inner())
}

/// An element ordered by `key` only, counting its drops
#[derive(Debug)]
pub struct Tracked {
    pub key: i32,
    pub payload: i32,
}

impl Tracked {
    pub fn new(key: i32) -> Self {
        Tracked { key, payload: 0 }
    }

    pub fn with_payload(key: i32, payload: i32) -> Self {
        Tracked { key, payload }
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Tracked {}

impl PartialOrd for Tracked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tracked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        *lock(&NUM_DROPPED) += 1;
    }
}

/// Run `f` and return how many `Tracked` values were dropped meanwhile
pub fn count_drops<F: FnOnce()>(f: F) -> usize {
    let _guard = lock(&DROP_MUTEX);
    *lock(&NUM_DROPPED) = 0;
    f();
    std::mem::replace(&mut *lock(&NUM_DROPPED), 0)
}
