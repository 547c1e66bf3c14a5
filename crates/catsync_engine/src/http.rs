//! HTTP client abstraction and the `reqwest`-backed implementation.

use crate::error::{SyncError, SyncResult};
use catsync_model::Method;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;
use url::Url;

/// One outbound propagation request.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// HTTP method.
    pub method: Method,
    /// Fully-built target URL.
    pub url: String,
    /// Bearer token, when the credential loader succeeded.
    pub bearer: Option<String>,
    /// JSON body; `None` for delete propagation.
    pub body: Option<String>,
}

/// Response to an outbound request.
///
/// Any HTTP status, including 4xx and 5xx, is a *response*; only failures
/// below the HTTP layer surface as errors from [`HttpClient::send`].
/// Status classification belongs to the synchronizer.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

impl HttpResponse {
    /// True for 5xx statuses.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual HTTP transport. This allows
/// using different HTTP libraries, or a scripted mock for testing.
pub trait HttpClient: Send + Sync {
    /// Sends one request and returns the response.
    fn send(&self, request: &OutboundRequest) -> SyncResult<HttpResponse>;
}

/// Production [`HttpClient`] backed by `reqwest::blocking`.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with a bounded connect/read timeout.
    pub fn new(timeout: Duration) -> SyncResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::transport(e.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn send(&self, request: &OutboundRequest) -> SyncResult<HttpResponse> {
        let url = Url::parse(&request.url)
            .map_err(|e| SyncError::invalid_url(&request.url, e.to_string()))?;

        let method = match request.method {
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
        };

        let mut builder = self
            .client
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .map_err(|e| SyncError::transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}

/// A scripted [`HttpClient`] for tests.
///
/// Outcomes are consumed FIFO; every sent request is recorded. With an
/// exhausted script, `send` fails with a transport error. Clones share
/// the same script and request log, so a test can keep a handle after
/// handing the client to a synchronizer.
#[derive(Clone, Default)]
pub struct MockClient {
    inner: std::sync::Arc<MockInner>,
}

#[derive(Default)]
struct MockInner {
    script: Mutex<VecDeque<SyncResult<HttpResponse>>>,
    sent: Mutex<Vec<OutboundRequest>>,
}

impl MockClient {
    /// Creates a mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a response with the given status and body.
    pub fn respond(&self, status: u16, body: impl Into<String>) {
        self.inner.script.lock().push_back(Ok(HttpResponse {
            status,
            body: body.into(),
        }));
    }

    /// Scripts a transport-level failure.
    pub fn fail(&self, message: impl Into<String>) {
        self.inner
            .script
            .lock()
            .push_back(Err(SyncError::transport(message)));
    }

    /// Returns all requests sent so far.
    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.inner.sent.lock().clone()
    }

    /// Returns the number of requests sent so far.
    pub fn request_count(&self) -> usize {
        self.inner.sent.lock().len()
    }
}

impl HttpClient for MockClient {
    fn send(&self, request: &OutboundRequest) -> SyncResult<HttpResponse> {
        self.inner.sent.lock().push(request.clone());
        self.inner
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(SyncError::transport("no scripted response")))
    }
}
