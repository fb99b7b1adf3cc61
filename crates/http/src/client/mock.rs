//! In-process fixture responder used in mock mode
//!
//! Fixtures are matched in registration order by method and path pattern.
//! Requests no fixture handles are passed to the wrapped real transport, or
//! fail with a network error when there is none.

use super::error::ClientError;
use super::transport::{Attempt, PendingRequest, RawResponse, Transport};
use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use trabuddy_core::{PathParams, PathPattern};

/// Request as seen by a fixture handler
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub params: PathParams,
    pub body: Option<JsonValue>,
    pub attempt: Attempt,
    /// `Cookie` header sent with the request, if any
    pub cookie: Option<String>,
}

impl MockRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Response produced by a fixture handler
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: u16,
    body: Option<JsonValue>,
    headers: Vec<(String, String)>,
}

impl MockResponse {
    /// 200 with a JSON body
    pub fn json<T: Serialize>(body: &T) -> Self {
        let body = serde_json::to_value(body).unwrap_or_else(|error| {
            warn!(%error, "Fixture body failed to serialize");
            JsonValue::Null
        });
        Self {
            status: 200,
            body: Some(body),
            headers: Vec::new(),
        }
    }

    /// 200 with no body
    pub fn empty() -> Self {
        Self {
            status: 200,
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add a `Set-Cookie` header
    pub fn set_cookie(self, name: &str, value: &str) -> Self {
        self.with_header("set-cookie", format!("{name}={value}; Path=/; HttpOnly"))
    }

    fn into_raw(self) -> RawResponse {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.append(name, value);
                }
                _ => warn!(header = %name, "Skipping invalid fixture header"),
            }
        }
        RawResponse {
            status: self.status,
            headers,
            body: self.body.map(|body| body.to_string()).unwrap_or_default(),
        }
    }
}

type Handler = Arc<dyn Fn(&MockRequest) -> MockResponse + Send + Sync>;

#[derive(Clone)]
struct Fixture {
    method: Method,
    pattern: PathPattern,
    handler: Handler,
}

/// A request the mock transport received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub attempt: Attempt,
    pub cookie: Option<String>,
    /// Whether a fixture answered it
    pub handled: bool,
}

/// Fixture-backed transport
#[derive(Clone, Default)]
pub struct MockTransport {
    fixtures: Vec<Fixture>,
    passthrough: Option<Arc<dyn Transport>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixture for a method and path pattern
    pub fn on<F>(mut self, method: Method, pattern: &str, handler: F) -> Self
    where
        F: Fn(&MockRequest) -> MockResponse + Send + Sync + 'static,
    {
        self.fixtures.push(Fixture {
            method,
            pattern: PathPattern::new(pattern),
            handler: Arc::new(handler),
        });
        self
    }

    /// Add every fixture of another mock after this one's
    pub fn merge(mut self, other: MockTransport) -> Self {
        self.fixtures.extend(other.fixtures);
        self
    }

    /// Forward unhandled requests to a real transport
    pub fn passthrough(mut self, transport: Arc<dyn Transport>) -> Self {
        self.passthrough = Some(transport);
        self
    }

    /// Every request received so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Number of requests received for a method and exact path
    pub fn call_count(&self, method: &Method, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| &call.method == method && call.path == path)
            .count()
    }

    fn record(&self, request: &PendingRequest, cookie: Option<String>, handled: bool) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                method: request.method().clone(),
                path: request.path().to_string(),
                attempt: request.attempt(),
                cookie,
                handled,
            });
        }
    }

    fn find(&self, request: &PendingRequest) -> Option<(&Fixture, PathParams)> {
        self.fixtures
            .iter()
            .filter(|fixture| &fixture.method == request.method())
            .find_map(|fixture| {
                fixture
                    .pattern
                    .matches(request.path())
                    .map(|params| (fixture, params))
            })
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Transport for MockTransport {
    async fn send(&self, request: &PendingRequest) -> Result<RawResponse, ClientError> {
        let cookie = request
            .headers()
            .get(COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        if let Some((fixture, params)) = self.find(request) {
            self.record(request, cookie.clone(), true);
            debug!(
                method = %request.method(),
                path = request.path(),
                pattern = fixture.pattern.as_str(),
                "Answering from fixture"
            );
            let mock_request = MockRequest {
                method: request.method().clone(),
                path: request.path().to_string(),
                query: request.query_pairs().to_vec(),
                params,
                body: request.body().cloned(),
                attempt: request.attempt(),
                cookie,
            };
            return Ok((fixture.handler)(&mock_request).into_raw());
        }

        self.record(request, cookie, false);
        match &self.passthrough {
            Some(transport) => transport.send(request).await,
            None => Err(ClientError::network(format!(
                "no fixture for {} {}",
                request.method(),
                request.path()
            ))),
        }
    }
}
