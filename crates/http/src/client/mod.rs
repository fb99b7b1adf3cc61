//! Trabuddy HTTP client

pub mod attractions;
pub mod auth;
pub mod error;
pub mod mock;
pub mod plans;
pub mod refresh;
pub mod transport;
pub mod users;

pub use error::{ClientError, RefreshFailure};
pub use mock::{MockRequest, MockResponse, MockTransport};
pub use transport::{Attempt, HttpTransport, PendingRequest, RawResponse, Transport};

use chrono::Utc;
use cookie::Cookie;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use trabuddy_core::{ApiConfig, AuthContext};

/// Trabuddy API client
///
/// Every call goes through [`TrabuddyClient::execute`], which applies the
/// single refresh-and-replay recovery for expired access tokens.
#[derive(Clone)]
pub struct TrabuddyClient {
    transport: Arc<dyn Transport>,
    context: Arc<AuthContext>,
    /// Navigate to the login entry point when a 401 cannot be recovered
    login_redirect: bool,
}

impl TrabuddyClient {
    /// Create a client over an explicit transport
    pub fn new(transport: Arc<dyn Transport>, context: Arc<AuthContext>) -> Self {
        Self {
            transport,
            context,
            login_redirect: true,
        }
    }

    /// Create a new client builder
    pub fn builder() -> TrabuddyClientBuilder {
        TrabuddyClientBuilder::default()
    }

    pub fn context(&self) -> &Arc<AuthContext> {
        &self.context
    }

    /// Same client, but an unrecoverable 401 only clears the session
    ///
    /// Callers that are themselves deciding where to navigate, such as the
    /// route guard, use this and handle the lost session on their own.
    pub fn without_login_redirect(&self) -> Self {
        Self {
            login_redirect: false,
            ..self.clone()
        }
    }

    /// Create a request description
    pub fn request(&self, method: Method, path: &str) -> PendingRequest {
        PendingRequest::new(method, path)
    }

    /// Send exactly one attempt, without any refresh handling
    ///
    /// Non-2xx responses become [`ClientError::HttpStatus`].
    pub async fn send_once(&self, request: &PendingRequest) -> Result<RawResponse, ClientError> {
        let response = self.transport.send(&self.with_cookies(request)).await?;
        self.absorb_cookies(&response);

        if response.is_success() {
            Ok(response)
        } else {
            debug!(
                status = response.status,
                path = request.path(),
                "Request returned error status"
            );
            Err(ClientError::from_status(response.status, response.body))
        }
    }

    /// Execute a request and decode its JSON body
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: PendingRequest,
    ) -> Result<T, ClientError> {
        self.dispatch(request).await?.json()
    }

    /// Execute a request whose response body is irrelevant
    pub async fn execute_unit(&self, request: PendingRequest) -> Result<(), ClientError> {
        self.dispatch(request).await.map(|_| ())
    }

    // Browsers attach cookies themselves and refuse a manual Cookie header
    #[cfg(not(target_arch = "wasm32"))]
    fn with_cookies(&self, request: &PendingRequest) -> PendingRequest {
        use reqwest::header::{COOKIE, HeaderValue};

        let pairs = self.context.tokens().cookie_pairs();
        if pairs.is_empty() {
            return request.clone();
        }
        let cookie = pairs
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        match HeaderValue::from_str(&cookie) {
            Ok(value) => request.clone().header(COOKIE, value),
            Err(_) => {
                warn!("Stored token is not a valid cookie value; sending without cookies");
                request.clone()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn with_cookies(&self, request: &PendingRequest) -> PendingRequest {
        request.clone()
    }

    fn absorb_cookies(&self, response: &RawResponse) {
        for raw in response.set_cookies() {
            let Some(update) = parse_set_cookie(raw) else {
                continue;
            };
            match self
                .context
                .tokens()
                .absorb_cookie(&update.name, update.value.as_deref())
            {
                Ok(true) => debug!(
                    cookie = %update.name,
                    removed = update.value.is_none(),
                    "Updated token cookie"
                ),
                Ok(false) => {}
                Err(error) => warn!(%error, cookie = %update.name, "Failed to store token cookie"),
            }
        }
    }
}

/// Cookie change carried by one `Set-Cookie` header
#[derive(Debug, PartialEq, Eq)]
struct CookieUpdate {
    name: String,
    /// `None` when the header deletes the cookie
    value: Option<String>,
}

/// Parse a `Set-Cookie` header
///
/// A non-positive `Max-Age`, an `Expires` date that has passed, or an empty
/// value all delete the cookie.
fn parse_set_cookie(raw: &str) -> Option<CookieUpdate> {
    let cookie = Cookie::parse(raw).ok()?;
    let now = Utc::now().timestamp();
    let expired = cookie.max_age().is_some_and(|age| !age.is_positive())
        || cookie
            .expires_datetime()
            .is_some_and(|at| at.unix_timestamp() <= now);
    let value = cookie.value().trim_matches('"');

    Some(CookieUpdate {
        name: cookie.name().to_string(),
        value: (!expired && !value.is_empty()).then(|| value.to_string()),
    })
}

/// Builder for TrabuddyClient
#[derive(Default)]
pub struct TrabuddyClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
    mock: Option<MockTransport>,
    context: Option<Arc<AuthContext>>,
}

impl TrabuddyClientBuilder {
    /// Apply base URL and timeout from configuration
    pub fn config(mut self, config: &ApiConfig) -> Self {
        self.base_url = Some(config.base_url.clone());
        self.timeout = Some(config.timeout());
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a custom transport instead of HTTP
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Answer matching requests from fixtures; the rest pass through to the
    /// real transport
    pub fn mock(mut self, mock: MockTransport) -> Self {
        self.mock = Some(mock);
        self
    }

    /// Session context shared with the route guard
    pub fn context(mut self, context: Arc<AuthContext>) -> Self {
        self.context = Some(context);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<TrabuddyClient, ClientError> {
        let context = self
            .context
            .ok_or_else(|| ClientError::Configuration("auth context is required".into()))?;

        let real: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let base_url = self
                    .base_url
                    .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;
                let timeout = self
                    .timeout
                    .unwrap_or_else(|| ApiConfig::default().timeout());
                Arc::new(HttpTransport::new(base_url, timeout)?)
            }
        };

        let transport = match self.mock {
            Some(mock) => Arc::new(mock.passthrough(real)) as Arc<dyn Transport>,
            None => real,
        };

        Ok(TrabuddyClient::new(transport, context))
    }
}
