//! HTTP dispatcher with error classification
//!
//! Sends a [`TransportRequest`] exactly once and resolves it to either the
//! decoded response or a single [`FetchError`]:
//! - No connectivity short-circuits before any I/O
//! - Transport failures are split into host-not-found, timeout and other
//! - Non-2xx statuses are classified by code without touching the body
//! - An empty 2xx body counts as `NotFound`
//! - Anything else is decoded into the caller's type

use super::connectivity::{AssumeConnected, Connectivity};
use crate::config::ServiceConfig;
use crate::error::{FetchError, Result, TransportFailure};
use crate::request::{build_transport_request, RequestDescriptor, TransportRequest};
use crate::types::StringMap;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

/// A successful 2xx response with a non-empty body
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw body bytes
    pub body: Bytes,
}

impl RawResponse {
    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> std::result::Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::Decoding(e.to_string()))
    }
}

/// Dispatcher for the configured service
pub struct HttpClient {
    client: Client,
    config: ServiceConfig,
    connectivity: Arc<dyn Connectivity>,
}

impl HttpClient {
    /// Create a client for a service config
    pub fn new(config: ServiceConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            config,
            connectivity: Arc::new(AssumeConnected),
        })
    }

    /// Replace the connectivity check
    #[must_use]
    pub fn with_connectivity(mut self, connectivity: impl Connectivity + 'static) -> Self {
        self.connectivity = Arc::new(connectivity);
        self
    }

    /// Service configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Resolve a descriptor against the configured base URL
    pub fn build_request<T>(&self, descriptor: &RequestDescriptor<T>) -> Result<TransportRequest> {
        build_transport_request(descriptor, &self.config.base_url)
    }

    /// Send a request and return its raw 2xx body
    pub async fn execute(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<RawResponse, FetchError> {
        if !self.connectivity.is_connected() {
            warn!("No network connectivity, skipping {} {}", request.method, request.url);
            return Err(FetchError::NoConnectivity);
        }

        let mut req = self
            .client
            .request(request.method.into(), request.url.clone());

        req = req.headers(merge_headers(&self.config.headers, &request.headers)?);
        if let Some(body) = request.body {
            req = req.body(body);
        }
        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        let response = req.send().await.map_err(|e| {
            let failure = classify_transport_error(&e);
            warn!("Request to {} failed: {failure}", request.url);
            FetchError::Transport(failure)
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!("Request failed with {}: {} {}", status.as_u16(), request.method, request.url);
            return Err(FetchError::from_status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(classify_transport_error(&e)))?;

        if body.is_empty() {
            debug!("Empty {} body from {}", status.as_u16(), request.url);
            return Err(FetchError::NotFound);
        }

        debug!(body = %String::from_utf8_lossy(&body), "Response body from {}", request.url);

        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }

    /// Send a request and decode the response into `T`
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<T, FetchError> {
        let response = self.execute(request).await?;
        response.json().inspect_err(|e| warn!("{e}"))
    }

    /// Build a descriptor against the configured service and fetch it
    pub async fn get_json<T: DeserializeOwned>(&self, descriptor: &RequestDescriptor<T>) -> Result<T> {
        let request = self.build_request(descriptor)?;
        Ok(self.fetch(request).await?)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("connected", &self.connectivity.is_connected())
            .finish_non_exhaustive()
    }
}

/// Config headers overlaid with request headers, one value per name
///
/// Names compare case-insensitively, so a request header replaces a config
/// header of the same name.
fn merge_headers(
    config: &StringMap,
    request: &StringMap,
) -> std::result::Result<HeaderMap, FetchError> {
    let mut merged = HeaderMap::new();
    for (key, value) in config.iter().chain(request) {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            FetchError::Transport(TransportFailure::Other(format!("invalid header name {key}: {e}")))
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            FetchError::Transport(TransportFailure::Other(format!("invalid value for header {key}: {e}")))
        })?;
        merged.insert(name, value);
    }
    Ok(merged)
}

/// Map a reqwest failure to a transport category
pub(crate) fn classify_transport_error(err: &reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        return TransportFailure::TimedOut;
    }
    let chain = error_chain(err);
    if err.is_connect() && is_host_lookup_failure(&chain) {
        TransportFailure::HostNotFound
    } else {
        TransportFailure::Other(chain)
    }
}

/// Render an error and all of its sources
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        rendered.push_str(": ");
        rendered.push_str(&inner.to_string());
        source = inner.source();
    }
    rendered
}

/// Whether a rendered error chain describes a failed DNS lookup
pub(crate) fn is_host_lookup_failure(chain: &str) -> bool {
    let chain = chain.to_ascii_lowercase();
    [
        "dns error",
        "failed to lookup address",
        "name or service not known",
        "no such host",
        "nodename nor servname",
    ]
    .iter()
    .any(|needle| chain.contains(needle))
}
