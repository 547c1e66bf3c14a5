//! Periodic retry scheduling.

use crate::http::HttpClient;
use crate::synchronizer::Synchronizer;
use catsync_model::CatalogueResource;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;
use tracing::debug;

struct Shared {
    cancelled: AtomicBool,
    lock: Mutex<()>,
    wake: Condvar,
}

/// Periodically gives previously-failed operations another chance.
///
/// Each synchronizer instance owns one scheduler running on its own
/// thread: the first sweep fires immediately, then once per configured
/// sweep interval. Shutdown is cooperative: the current sweep finishes
/// (re-enqueueing its operation on failure) before the thread exits.
pub struct RetryScheduler<T: CatalogueResource, C: HttpClient + 'static> {
    synchronizer: Arc<Synchronizer<T, C>>,
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl<T: CatalogueResource, C: HttpClient + 'static> RetryScheduler<T, C> {
    /// Starts sweeping the given synchronizer's retry queue.
    pub fn start(synchronizer: Arc<Synchronizer<T, C>>) -> Self {
        let shared = Arc::new(Shared {
            cancelled: AtomicBool::new(false),
            lock: Mutex::new(()),
            wake: Condvar::new(),
        });

        let thread_shared = Arc::clone(&shared);
        let thread_sync = Arc::clone(&synchronizer);
        let interval = synchronizer.sweep_interval();

        let handle = std::thread::spawn(move || {
            debug!(kind = T::kind(), "retry scheduler started");
            while !thread_shared.cancelled.load(Ordering::SeqCst) {
                thread_sync.sweep();

                let deadline = Instant::now() + interval;
                let mut guard = thread_shared.lock.lock();
                while !thread_shared.cancelled.load(Ordering::SeqCst) {
                    let result = thread_shared.wake.wait_until(&mut guard, deadline);
                    if result.timed_out() {
                        break;
                    }
                }
            }
            debug!(kind = T::kind(), "retry scheduler stopped");
        });

        Self {
            synchronizer,
            shared,
            handle: Some(handle),
        }
    }

    /// Stops the scheduler and waits for the sweep thread to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.shared.cancelled.store(true, Ordering::SeqCst);
        // unblock a sweep waiting on the queue, without losing items
        self.synchronizer.close();
        self.shared.wake.notify_all();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl<T: CatalogueResource, C: HttpClient + 'static> Drop for RetryScheduler<T, C> {
    fn drop(&mut self) {
        self.stop();
    }
}
