//! Bounded FIFO queue of operations awaiting retry.

use catsync_model::SyncAction;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

/// A queued, not-yet-successfully-delivered (resource, action) pair.
///
/// Immutable once created. A failed re-attempt produces a new pending
/// operation appended at the tail; the original is never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingOperation<T> {
    /// The resource payload as it was at mutation time.
    pub resource: T,
    /// The mutation kind to replay.
    pub action: SyncAction,
}

impl<T> PendingOperation<T> {
    /// Creates a new pending operation.
    pub fn new(resource: T, action: SyncAction) -> Self {
        Self { resource, action }
    }
}

/// Bounded, multi-producer FIFO queue of pending operations.
///
/// Items are only ever appended at the tail and removed from the head.
/// On overflow the oldest entry is evicted and handed back to the caller
/// for logging, so a full queue never silently loses a mutation.
/// Nothing is persisted; queue contents die with the process.
#[derive(Debug)]
pub struct RetryQueue<T> {
    items: Mutex<VecDeque<PendingOperation<T>>>,
    available: Condvar,
    capacity: usize,
    closed: AtomicBool,
}

impl<T> RetryQueue<T> {
    /// Creates a queue with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            capacity: capacity.max(1),
            closed: AtomicBool::new(false),
        }
    }

    /// Appends an operation at the tail.
    ///
    /// Returns the evicted head when the queue was at capacity.
    pub fn push(&self, operation: PendingOperation<T>) -> Option<PendingOperation<T>> {
        let mut items = self.items.lock();
        let evicted = if items.len() >= self.capacity {
            items.pop_front()
        } else {
            None
        };
        items.push_back(operation);
        drop(items);
        self.available.notify_one();
        evicted
    }

    /// Removes and returns the head, blocking until an item exists.
    ///
    /// Returns `None` once the queue is closed and drained. A blocked
    /// caller never consumes an item it did not receive.
    pub fn take(&self) -> Option<PendingOperation<T>> {
        let mut items = self.items.lock();
        loop {
            if let Some(operation) = items.pop_front() {
                return Some(operation);
            }
            if self.closed.load(Ordering::SeqCst) {
                return None;
            }
            self.available.wait(&mut items);
        }
    }

    /// Removes and returns the head without blocking.
    pub fn try_take(&self) -> Option<PendingOperation<T>> {
        self.items.lock().pop_front()
    }

    /// Wakes all blocked takers; subsequent waits return `None` when empty.
    ///
    /// Pushing is still permitted after close, so an in-flight retry that
    /// fails during shutdown is not lost.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.available.notify_all();
    }

    /// Returns the current queue depth.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Returns true when no operations are queued.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}
