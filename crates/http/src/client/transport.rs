//! Request descriptions and the network layer that sends them

use super::error::ClientError;
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::debug;

#[cfg(not(target_arch = "wasm32"))]
const USER_AGENT: &str = concat!("trabuddy-client/", env!("CARGO_PKG_VERSION"));

/// Whether a request is on its first attempt or is the single replay that
/// follows a token refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    First,
    Retried,
}

/// Full description of one HTTP call
///
/// Values are immutable; a replay is a new value produced by
/// [`PendingRequest::into_retry`], which refuses to produce a second one.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<JsonValue>,
    attempt: Attempt,
}

impl PendingRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            attempt: Attempt::First,
        }
    }

    /// Add a query parameter; `None` values are skipped
    pub fn query<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&JsonValue> {
        self.body.as_ref()
    }

    pub fn attempt(&self) -> Attempt {
        self.attempt
    }

    /// The replay of this request, or `None` if it already is one
    pub fn into_retry(self) -> Option<Self> {
        match self.attempt {
            Attempt::First => Some(Self {
                attempt: Attempt::Retried,
                ..self
            }),
            Attempt::Retried => None,
        }
    }

    /// Path plus encoded query string
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{}", self.path, query)
    }

    /// Write methods carry a JSON content type by default
    pub fn is_write(&self) -> bool {
        matches!(self.method, Method::POST | Method::PUT | Method::PATCH)
    }
}

/// Response as received from the network, before status interpretation
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body; an empty body decodes as JSON `null`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        let body = self.body.trim();
        if body.is_empty() {
            return Ok(serde_json::from_value(JsonValue::Null)?);
        }
        Ok(serde_json::from_str(body)?)
    }

    /// Raw `Set-Cookie` header values
    pub fn set_cookies(&self) -> impl Iterator<Item = &str> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
    }
}

/// The network layer beneath the client
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &PendingRequest) -> Result<RawResponse, ClientError>;
}

/// Transport that talks to the backend over HTTP
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        #[cfg(not(target_arch = "wasm32"))]
        let client = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        #[cfg(target_arch = "wasm32")]
        let client = {
            // The browser owns timeouts and the user agent
            let _ = timeout;
            ClientBuilder::new().build()?
        };

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Transport for HttpTransport {
    async fn send(&self, request: &PendingRequest) -> Result<RawResponse, ClientError> {
        let url = format!("{}{}", self.base_url, request.path_and_query());
        debug!(method = %request.method(), %url, attempt = ?request.attempt(), "Sending request");

        let mut builder = self
            .client
            .request(request.method().clone(), url)
            .headers(request.headers().clone());

        if request.is_write() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        if let Some(body) = request.body() {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
