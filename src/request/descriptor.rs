//! Request descriptors and their transport form

use crate::error::{Error, Result};
use crate::types::{JsonValue, Method, StringMap, ValueMap};
use bytes::Bytes;
use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Content type attached to every descriptor unless its headers are overridden
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Description of one API call whose response decodes into `T`
///
/// Built fresh for every call and consumed by [`build_transport_request`].
pub struct RequestDescriptor<T> {
    path: String,
    method: Method,
    query: Option<ValueMap>,
    body: Option<ValueMap>,
    headers: StringMap,
    response: PhantomData<fn() -> T>,
}

impl<T> RequestDescriptor<T> {
    /// Create a GET descriptor for a path relative to the service root
    pub fn new(path: impl Into<String>) -> Self {
        let mut headers = StringMap::new();
        headers.insert("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string());
        Self {
            path: path.into(),
            method: Method::GET,
            query: None,
            body: None,
            headers,
            response: PhantomData,
        }
    }

    /// Set the HTTP method
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.query
            .get_or_insert_with(ValueMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Merge a set of query parameters, replacing existing keys
    #[must_use]
    pub fn queries(mut self, params: ValueMap) -> Self {
        self.query.get_or_insert_with(ValueMap::new).extend(params);
        self
    }

    /// Set the JSON body
    #[must_use]
    pub fn body(mut self, body: ValueMap) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a single field to the JSON body
    #[must_use]
    pub fn body_field(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.body
            .get_or_insert_with(ValueMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Add or replace a header; names match case-insensitively
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&key));
        self.headers.insert(key, value.into());
        self
    }

    /// Replace the whole header set, dropping the default content type
    #[must_use]
    pub fn headers(mut self, headers: StringMap) -> Self {
        self.headers = headers;
        self
    }

    /// Path relative to the service root
    pub fn path(&self) -> &str {
        &self.path
    }

    /// HTTP method
    pub fn http_method(&self) -> Method {
        self.method
    }

    /// Query parameters, if any were set
    pub fn query_params(&self) -> Option<&ValueMap> {
        self.query.as_ref()
    }

    /// Body fields, if a body was set
    pub fn body_fields(&self) -> Option<&ValueMap> {
        self.body.as_ref()
    }

    /// Headers
    pub fn header_map(&self) -> &StringMap {
        &self.headers
    }

    /// Resolve against `base_url`, same as [`build_transport_request`]
    pub fn with_base(&self, base_url: &str) -> Result<TransportRequest> {
        build_transport_request(self, base_url)
    }
}

impl<T> Clone for RequestDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            method: self.method,
            query: self.query.clone(),
            body: self.body.clone(),
            headers: self.headers.clone(),
            response: PhantomData,
        }
    }
}

impl<T> fmt::Debug for RequestDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("path", &self.path)
            .field("method", &self.method)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("headers", &self.headers)
            .field("response", &std::any::type_name::<T>())
            .finish()
    }
}

/// A fully resolved request, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL including the encoded query string
    pub url: Url,
    /// Header set
    pub headers: StringMap,
    /// Serialized JSON body
    pub body: Option<Bytes>,
    /// Per-request timeout (`None` waits indefinitely)
    pub timeout: Option<Duration>,
}

impl TransportRequest {
    /// Decoded query pairs of the URL, in order
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Single header value by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Resolve a descriptor against a base URL
///
/// The descriptor path is appended to the base URL's own path. Query parameters
/// are encoded in key order. A body that fails to serialize is left out rather
/// than failing the build.
pub fn build_transport_request<T>(
    descriptor: &RequestDescriptor<T>,
    base_url: &str,
) -> Result<TransportRequest> {
    let mut url = Url::parse(base_url)?;
    if url.cannot_be_a_base() {
        return Err(Error::config(format!(
            "Base URL '{base_url}' cannot carry a path"
        )));
    }

    let path = join_paths(url.path(), &descriptor.path);
    url.set_path(&path);

    if let Some(params) = descriptor.query.as_ref().filter(|p| !p.is_empty()) {
        debug!(?params, "Encoding query parameters");
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, &encode_query_value(value));
        }
    }

    let body = descriptor.body.as_ref().and_then(serialize_body);

    debug!(method = %descriptor.method, %url, headers = ?descriptor.headers, "Built request");

    Ok(TransportRequest {
        method: descriptor.method,
        url,
        headers: descriptor.headers.clone(),
        body,
        timeout: None,
    })
}

/// String form of a query value
///
/// Strings are sent verbatim, `null` as an empty string, everything else as
/// compact JSON text.
pub fn encode_query_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn join_paths(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.is_empty() || path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

fn serialize_body(body: &ValueMap) -> Option<Bytes> {
    match serde_json::to_vec(body) {
        Ok(bytes) => {
            debug!(?body, "Serialized request body");
            Some(Bytes::from(bytes))
        }
        Err(e) => {
            warn!("Dropping request body that failed to serialize: {e}");
            None
        }
    }
}
