//! The per-resource-type synchronizer.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::http::{HttpClient, OutboundRequest};
use crate::queue::{PendingOperation, RetryQueue};
use crate::token::TokenFile;
use catsync_model::{CatalogueResource, SyncAction};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

/// Operational counters for a synchronizer instance.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Total propagation attempts (immediate and retried).
    pub attempted: u64,
    /// Attempts that reached the remote mirror with the expected status.
    pub delivered: u64,
    /// Attempts that failed and were appended to the retry queue.
    pub requeued: u64,
    /// Operations lost to queue overflow.
    pub dropped: u64,
    /// Retry sweeps executed.
    pub sweeps: u64,
    /// Message of the most recent failure.
    pub last_error: Option<String>,
}

/// Mirrors local catalogue mutations for one resource type to a remote
/// catalogue.
///
/// One instance exists per resource type, parameterized by the resource's
/// wire type `T` and its remote controller sub-path. The instance owns its
/// retry queue; failed propagations are appended there and re-attempted by
/// the owning [`RetryScheduler`](crate::RetryScheduler).
///
/// Propagation is fire-and-forget: [`propagate`](Self::propagate) never
/// returns an error and never panics, so the calling CRUD manager is never
/// blocked on, or exposed to, remote failures.
pub struct Synchronizer<T: CatalogueResource, C: HttpClient> {
    config: SyncConfig,
    controller: String,
    client: Arc<C>,
    token: TokenFile,
    queue: RetryQueue<T>,
    active: bool,
    stats: RwLock<SyncStats>,
}

impl<T: CatalogueResource, C: HttpClient> Synchronizer<T, C> {
    /// Creates a synchronizer for the given remote controller sub-path.
    pub fn new(config: SyncConfig, controller: impl Into<String>, client: C) -> Self {
        let active = config.is_active();
        let token = TokenFile::new(config.token_filepath.clone());
        let queue = RetryQueue::new(config.queue_capacity);
        Self {
            config,
            controller: controller.into(),
            client: Arc::new(client),
            token,
            queue,
            active,
            stats: RwLock::new(SyncStats::default()),
        }
    }

    /// Returns true when this synchronizer propagates at all.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the current retry queue depth.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Returns a snapshot of the operational counters.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Interval between retry sweeps, from the configuration.
    pub fn sweep_interval(&self) -> Duration {
        self.config.sweep_interval
    }

    /// Closes the retry queue so a blocked sweep exits cleanly.
    pub fn close(&self) {
        self.queue.close();
    }

    /// Attempts immediate delivery of one mutation; queues it on failure.
    ///
    /// A no-op when the synchronizer is disabled. Performs exactly one
    /// outbound HTTP call; the queue is touched only when that call does
    /// not produce the action's designated success status.
    pub fn propagate(&self, resource: &T, action: SyncAction) {
        if !self.active {
            return;
        }

        self.stats.write().attempted += 1;

        match self.attempt(resource, action) {
            Ok(()) => {
                debug!(
                    kind = T::kind(),
                    id = resource.id(),
                    %action,
                    "propagated to remote mirror"
                );
                self.stats.write().delivered += 1;
            }
            Err(e) => {
                self.log_failure(resource, action, &e);
                self.enqueue(resource.clone(), action, &e);
            }
        }
    }

    /// Runs one retry sweep.
    ///
    /// Logs the queue depth when non-empty, then re-attempts at most
    /// `retries_per_sweep` operations from the head of the queue. A failed
    /// re-attempt is appended back at the tail, behind any other queued
    /// items, so one repeatedly-failing operation cannot starve the rest.
    pub fn sweep(&self) {
        if !self.active {
            return;
        }

        self.stats.write().sweeps += 1;

        let depth = self.queue.len();
        if depth == 0 {
            return;
        }
        warn!(
            kind = T::kind(),
            depth, "operations waiting to be synchronized"
        );

        let mut tries = 0;
        while tries < self.config.retries_per_sweep && !self.queue.is_empty() {
            // take() blocks only if another consumer raced us to the head;
            // a close() during the wait ends the sweep without losing items.
            let Some(operation) = self.queue.take() else {
                return;
            };
            info!(
                kind = T::kind(),
                id = operation.resource.id(),
                action = %operation.action,
                "re-attempting queued operation"
            );
            self.propagate(&operation.resource, operation.action);
            tries += 1;
        }
    }

    fn attempt(&self, resource: &T, action: SyncAction) -> SyncResult<()> {
        let url = self.target_url(resource, action)?;

        let body = if action.has_body() {
            Some(serde_json::to_string(resource)?)
        } else {
            None
        };

        let request = OutboundRequest {
            method: action.method(),
            url,
            bearer: self.token.bearer(),
            body,
        };

        let response = self.client.send(&request)?;
        let expected = action.expected_status();

        if response.status == expected {
            Ok(())
        } else if response.is_server_error() {
            Err(SyncError::ServerError {
                status: response.status,
                body: response.body,
            })
        } else {
            Err(SyncError::UnexpectedStatus {
                status: response.status,
                expected,
                body: response.body,
            })
        }
    }

    /// Builds the target URL, tolerating trailing/missing slashes on the
    /// host and controller path.
    fn target_url(&self, resource: &T, action: SyncAction) -> SyncResult<String> {
        let base = format!(
            "{}/{}",
            self.config.host.trim_end_matches('/'),
            self.controller.trim_matches('/')
        );

        let url = match action {
            SyncAction::Add => base,
            SyncAction::Update | SyncAction::Delete => {
                format!("{}/{}", base, resource.id())
            }
            SyncAction::Verify => {
                let state = resource.verify_state();
                format!(
                    "{}/{}/{}?active={}&status={}",
                    base,
                    T::verify_segment(),
                    resource.id(),
                    state.active,
                    urlencoding::encode(&state.status)
                )
            }
        };

        Url::parse(&url)
            .map(|parsed| parsed.to_string())
            .map_err(|e| SyncError::invalid_url(&url, e.to_string()))
    }

    fn enqueue(&self, resource: T, action: SyncAction, error: &SyncError) {
        {
            let mut stats = self.stats.write();
            stats.requeued += 1;
            stats.last_error = Some(error.to_string());
        }

        if let Some(lost) = self.queue.push(PendingOperation::new(resource, action)) {
            warn!(
                kind = T::kind(),
                id = lost.resource.id(),
                action = %lost.action,
                "retry queue full, dropping oldest pending operation"
            );
            self.stats.write().dropped += 1;
        }
    }

    fn log_failure(&self, resource: &T, action: SyncAction, error: &SyncError) {
        if error.is_auth_suspect() {
            error!(
                kind = T::kind(),
                id = resource.id(),
                host = %self.config.host,
                %action,
                "propagation failed, check if the sync token has expired: {error}"
            );
        } else {
            error!(
                kind = T::kind(),
                id = resource.id(),
                host = %self.config.host,
                %action,
                "propagation failed: {error}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockClient;
    use catsync_model::{Provider, Service};

    fn provider(id: &str) -> Provider {
        Provider {
            id: id.into(),
            abbreviation: "P".into(),
            name: "A Provider".into(),
            catalogue_id: None,
            active: true,
            status: None,
        }
    }

    fn service(id: &str) -> Service {
        Service {
            id: id.into(),
            name: "A Service".into(),
            resource_organisation: "org".into(),
            catalogue_id: None,
            active: true,
            status: None,
        }
    }

    fn config() -> SyncConfig {
        SyncConfig::new("https://mirror.example.com", "", true)
    }

    fn synchronizer(config: SyncConfig) -> (MockClient, Synchronizer<Provider, MockClient>) {
        let client = MockClient::new();
        let sync = Synchronizer::new(config, "/provider", client.clone());
        (client, sync)
    }

    #[test]
    fn disabled_synchronizer_is_inert() {
        let (client, sync) = synchronizer(SyncConfig::new("", "", true));
        sync.propagate(&provider("p1"), SyncAction::Add);
        sync.sweep();

        assert!(!sync.is_active());
        assert_eq!(client.request_count(), 0);
        assert_eq!(sync.queue_len(), 0);
        assert_eq!(sync.stats().attempted, 0);
    }

    #[test]
    fn success_leaves_queue_unchanged() {
        let (client, sync) = synchronizer(config());
        client.respond(201, "");

        sync.propagate(&provider("p1"), SyncAction::Add);

        assert_eq!(client.request_count(), 1);
        assert_eq!(sync.queue_len(), 0);
        assert_eq!(sync.stats().delivered, 1);
    }

    #[test]
    fn unexpected_status_queues_exactly_one() {
        let (client, sync) = synchronizer(config());
        client.respond(200, "wrong status for add");

        sync.propagate(&provider("p1"), SyncAction::Add);

        assert_eq!(sync.queue_len(), 1);
        let stats = sync.stats();
        assert_eq!(stats.requeued, 1);
        assert!(stats.last_error.unwrap().contains("expected 201"));
    }

    #[test]
    fn server_error_queues_with_body() {
        let (client, sync) = synchronizer(config());
        client.respond(503, "maintenance window");

        sync.propagate(&provider("p1"), SyncAction::Update);

        assert_eq!(sync.queue_len(), 1);
        assert!(sync.stats().last_error.unwrap().contains("maintenance window"));
    }

    #[test]
    fn unreachable_host_queues_delete() {
        let (client, sync) = synchronizer(config());
        client.fail("connection refused");

        sync.propagate(&provider("svcB"), SyncAction::Delete);

        assert_eq!(sync.queue_len(), 1);
        assert_eq!(sync.stats().requeued, 1);
    }

    #[test]
    fn missing_token_sends_without_authorization() {
        let cfg = SyncConfig::new(
            "https://mirror.example.com",
            "/nonexistent/sync-token",
            true,
        );
        let (client, sync) = synchronizer(cfg);
        client.respond(401, "unauthorized");

        sync.propagate(&provider("svcC"), SyncAction::Update);

        let sent = client.requests();
        assert!(sent[0].bearer.is_none());
        assert_eq!(sync.queue_len(), 1);
    }

    #[test]
    fn add_posts_to_controller_without_id() {
        let (client, sync) = synchronizer(config());
        client.respond(201, "");

        sync.propagate(&provider("p1"), SyncAction::Add);

        let sent = client.requests();
        assert_eq!(sent[0].method, catsync_model::Method::Post);
        assert_eq!(sent[0].url, "https://mirror.example.com/provider");
        assert!(sent[0].body.is_some());
    }

    #[test]
    fn delete_targets_id_with_empty_body() {
        let (client, sync) = synchronizer(config());
        client.respond(204, "");

        sync.propagate(&provider("p1"), SyncAction::Delete);

        let sent = client.requests();
        assert_eq!(sent[0].method, catsync_model::Method::Delete);
        assert_eq!(sent[0].url, "https://mirror.example.com/provider/p1");
        assert!(sent[0].body.is_none());
    }

    #[test]
    fn verify_patches_segment_with_encoded_query() {
        let (client, sync) = synchronizer(config());
        client.respond(200, "");

        sync.propagate(&provider("p1"), SyncAction::Verify);

        let sent = client.requests();
        assert_eq!(sent[0].method, catsync_model::Method::Patch);
        assert_eq!(
            sent[0].url,
            "https://mirror.example.com/provider/verifyProvider/p1?active=true&status=approved%20provider"
        );
    }

    #[test]
    fn service_verify_uses_generic_segment() {
        let client = MockClient::new();
        let sync: Synchronizer<Service, MockClient> =
            Synchronizer::new(config(), "/service", client.clone());
        client.respond(200, "");

        sync.propagate(&service("s1"), SyncAction::Verify);

        let sent = client.requests();
        assert!(sent[0].url.contains("/service/verifyResource/s1"));
        assert!(sent[0].url.contains("status=approved%20resource"));
    }

    #[test]
    fn slashes_are_normalized() {
        let cfg = SyncConfig::new("https://mirror.example.com/", "", true);
        let client = MockClient::new();
        let sync: Synchronizer<Provider, MockClient> =
            Synchronizer::new(cfg, "provider/", client.clone());
        client.respond(201, "");

        sync.propagate(&provider("p1"), SyncAction::Add);

        assert_eq!(client.requests()[0].url, "https://mirror.example.com/provider");
    }

    #[test]
    fn malformed_host_queues_without_http_call() {
        let cfg = SyncConfig::new("not-a-host", "", true);
        let (client, sync) = synchronizer(cfg);

        sync.propagate(&provider("p1"), SyncAction::Add);

        assert_eq!(client.request_count(), 0);
        assert_eq!(sync.queue_len(), 1);
        assert!(sync.stats().last_error.unwrap().contains("invalid target url"));
    }

    #[test]
    fn sweep_drains_on_success() {
        let (client, sync) = synchronizer(config());
        client.fail("connection refused");
        sync.propagate(&provider("svcA"), SyncAction::Add);
        assert_eq!(sync.queue_len(), 1);

        client.respond(201, "");
        sync.sweep();

        assert_eq!(sync.queue_len(), 0);
        assert_eq!(sync.stats().delivered, 1);
    }

    #[test]
    fn sweep_attempts_one_item_per_period() {
        let (client, sync) = synchronizer(config());
        client.fail("down");
        client.fail("down");
        sync.propagate(&provider("p1"), SyncAction::Add);
        sync.propagate(&provider("p2"), SyncAction::Update);
        assert_eq!(sync.queue_len(), 2);

        // Head is attempted and fails; p2 must stay untouched this sweep.
        client.fail("still down");
        sync.sweep();

        assert_eq!(sync.queue_len(), 2);
        assert_eq!(client.request_count(), 3);
        let head = sync.queue.try_take().unwrap();
        assert_eq!(head.resource.id, "p2");
        let tail = sync.queue.try_take().unwrap();
        assert_eq!(tail.resource.id, "p1");
    }

    #[test]
    fn failed_retry_requeues_at_tail() {
        let (client, sync) = synchronizer(config());
        client.fail("down");
        client.fail("down");
        sync.propagate(&provider("r1"), SyncAction::Add);
        sync.propagate(&provider("r2"), SyncAction::Update);

        // r1 fails again and must land behind r2
        client.fail("down");
        sync.sweep();
        // next sweep attempts r2
        client.respond(200, "");
        sync.sweep();

        assert_eq!(sync.queue_len(), 1);
        assert_eq!(sync.queue.try_take().unwrap().resource.id, "r1");
    }

    #[test]
    fn sweep_respects_configured_budget() {
        let (client, sync) = synchronizer(config().with_retries_per_sweep(2));
        client.fail("down");
        client.fail("down");
        sync.propagate(&provider("p1"), SyncAction::Add);
        sync.propagate(&provider("p2"), SyncAction::Update);

        client.respond(201, "");
        client.respond(200, "");
        sync.sweep();

        assert_eq!(sync.queue_len(), 0);
        assert_eq!(sync.stats().delivered, 2);
    }

    #[test]
    fn overflow_drops_oldest_and_counts_it() {
        let (client, sync) = synchronizer(config().with_queue_capacity(2));
        for id in ["p1", "p2", "p3"] {
            client.fail("down");
            sync.propagate(&provider(id), SyncAction::Add);
        }

        assert_eq!(sync.queue_len(), 2);
        assert_eq!(sync.stats().dropped, 1);
        assert_eq!(sync.queue.try_take().unwrap().resource.id, "p2");
    }
}
