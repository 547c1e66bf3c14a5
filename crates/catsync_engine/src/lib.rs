//! # Catsync Engine
//!
//! Retry queue, scheduler and HTTP propagation engine for catsync.
//!
//! This crate provides:
//! - A generic [`Synchronizer`] that mirrors local catalogue mutations to
//!   a remote catalogue over HTTP
//! - A bounded FIFO [`RetryQueue`] holding operations that failed delivery
//! - A periodic [`RetryScheduler`] that re-attempts queued operations
//! - An [`HttpClient`] abstraction with a `reqwest`-backed implementation
//! - A read-through bearer [`TokenFile`] loader
//!
//! ## Architecture
//!
//! One synchronizer is instantiated per resource type, each with its own
//! queue and scheduler; there is no shared state between resource types.
//! Propagation is **fire-and-forget**: `propagate` never returns an error
//! to the caller. A failed delivery is appended to the queue and retried
//! by the scheduler until it succeeds or the process exits.
//!
//! ## Key invariants
//!
//! - The queue is strictly FIFO: append at the tail, remove at the head
//! - A failed retry is re-appended at the tail, never the head
//! - At most `retries_per_sweep` operations are attempted per sweep
//!   (default 1, a deliberate throttle on the remote host)
//! - Nothing is persisted; a process restart drops all pending retries
//! - No delivery-order guarantee exists between a queued operation and a
//!   later immediately-successful one for the same resource id

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod queue;
mod scheduler;
mod synchronizer;
mod token;

pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};
pub use http::{HttpClient, HttpResponse, MockClient, OutboundRequest, ReqwestClient};
pub use queue::{PendingOperation, RetryQueue};
pub use scheduler::RetryScheduler;
pub use synchronizer::{SyncStats, Synchronizer};
pub use token::TokenFile;

use catsync_model::{Datasource, Provider, Service, TrainingResource};

/// Creates a provider synchronizer targeting `/provider` on the remote mirror.
pub fn provider_synchronizer(
    config: SyncConfig,
) -> SyncResult<Synchronizer<Provider, ReqwestClient>> {
    let client = ReqwestClient::new(config.timeout)?;
    Ok(Synchronizer::new(config, "/provider", client))
}

/// Creates a service synchronizer targeting `/service` on the remote mirror.
pub fn service_synchronizer(
    config: SyncConfig,
) -> SyncResult<Synchronizer<Service, ReqwestClient>> {
    let client = ReqwestClient::new(config.timeout)?;
    Ok(Synchronizer::new(config, "/service", client))
}

/// Creates a datasource synchronizer targeting `/datasource` on the remote mirror.
pub fn datasource_synchronizer(
    config: SyncConfig,
) -> SyncResult<Synchronizer<Datasource, ReqwestClient>> {
    let client = ReqwestClient::new(config.timeout)?;
    Ok(Synchronizer::new(config, "/datasource", client))
}

/// Creates a training resource synchronizer targeting `/trainingResource`
/// on the remote mirror.
pub fn training_resource_synchronizer(
    config: SyncConfig,
) -> SyncResult<Synchronizer<TrainingResource, ReqwestClient>> {
    let client = ReqwestClient::new(config.timeout)?;
    Ok(Synchronizer::new(config, "/trainingResource", client))
}
