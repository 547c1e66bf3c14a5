//! Configuration for the sync engine.

use std::time::Duration;

/// Configuration for a synchronizer instance.
///
/// Fixed at construction; never hot-reloaded. An empty `host` or a false
/// `enable` flag renders the synchronizer inert: `propagate` becomes a
/// no-op and nothing is ever queued.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the remote mirror. Empty disables sync entirely.
    pub host: String,
    /// Path of the file holding the bearer token, read fresh per call.
    pub token_filepath: String,
    /// Deployment-wide enable flag.
    pub enable: bool,
    /// Connect/read timeout for outbound requests.
    pub timeout: Duration,
    /// Interval between retry sweeps.
    pub sweep_interval: Duration,
    /// Maximum queued operations re-attempted per sweep.
    pub retries_per_sweep: u32,
    /// Capacity of the retry queue; the oldest entry is dropped on overflow.
    pub queue_capacity: usize,
}

impl SyncConfig {
    /// Creates a new sync configuration.
    pub fn new(
        host: impl Into<String>,
        token_filepath: impl Into<String>,
        enable: bool,
    ) -> Self {
        Self {
            host: host.into(),
            token_filepath: token_filepath.into(),
            enable,
            timeout: Duration::from_secs(30),
            sweep_interval: Duration::from_secs(300),
            retries_per_sweep: 1,
            queue_capacity: 10_000,
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the interval between retry sweeps.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Sets the maximum retries attempted per sweep.
    pub fn with_retries_per_sweep(mut self, retries: u32) -> Self {
        self.retries_per_sweep = retries;
        self
    }

    /// Sets the retry queue capacity.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Returns true if this configuration enables propagation at all.
    pub fn is_active(&self) -> bool {
        self.enable && !self.host.is_empty()
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new("", "", false)
    }
}
