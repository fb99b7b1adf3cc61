//! Explicit session context shared by the HTTP client and the route guard
//!
//! Holds the token store, the post-login redirect target, the resolved user
//! identity and the navigation seam. Everything is passed around as one
//! [`AuthContext`] instead of ambient global stores.

use crate::config::AuthConfig;
use crate::error::CoreResult;
use crate::storage::{KeyValueStore, MemoryStore};
use crate::types::{Credentials, UserIdentity};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info, warn};

/// Cookie-backed access/refresh token storage
#[derive(Clone)]
pub struct TokenStore {
    cookies: Arc<dyn KeyValueStore>,
    access_key: String,
    refresh_key: String,
}

impl TokenStore {
    pub fn new(
        cookies: Arc<dyn KeyValueStore>,
        access_key: impl Into<String>,
        refresh_key: impl Into<String>,
    ) -> Self {
        Self {
            cookies,
            access_key: access_key.into(),
            refresh_key: refresh_key.into(),
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.cookies.get(&self.access_key).filter(|v| !v.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.cookies.get(&self.refresh_key).filter(|v| !v.is_empty())
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token().is_some()
    }

    /// Whether any credential is present that could yield an identity
    pub fn has_any_token(&self) -> bool {
        self.access_token().is_some() || self.has_refresh_token()
    }

    pub fn credentials(&self) -> Option<Credentials> {
        Some(Credentials {
            access_token: self.access_token()?,
            refresh_token: self.refresh_token()?,
        })
    }

    pub fn store(&self, credentials: &Credentials) -> CoreResult<()> {
        self.cookies.set(&self.access_key, &credentials.access_token)?;
        self.cookies.set(&self.refresh_key, &credentials.refresh_token)
    }

    /// Store or remove a single cookie by name; names other than the two
    /// token cookies are ignored
    pub fn absorb_cookie(&self, name: &str, value: Option<&str>) -> CoreResult<bool> {
        if name != self.access_key && name != self.refresh_key {
            return Ok(false);
        }
        match value {
            Some(value) if !value.is_empty() => self.cookies.set(name, value)?,
            _ => self.cookies.remove(name)?,
        }
        Ok(true)
    }

    /// `name=value` pairs for the tokens currently held
    pub fn cookie_pairs(&self) -> Vec<(String, String)> {
        [
            (&self.access_key, self.access_token()),
            (&self.refresh_key, self.refresh_token()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key.clone(), value)))
        .collect()
    }

    pub fn clear(&self) -> CoreResult<()> {
        self.cookies.remove(&self.access_key)?;
        self.cookies.remove(&self.refresh_key)
    }
}

/// Session-scoped storage of at most one post-login redirect target
#[derive(Clone)]
pub struct RedirectState {
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

impl RedirectState {
    pub fn new(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Overwrite the target; `None` clears it
    pub fn set_redirect_target(&self, path: Option<&str>) -> CoreResult<()> {
        match path {
            Some(path) => {
                debug!(target_path = path, "Saving redirect target");
                self.storage.set(&self.key, path)
            }
            None => self.storage.remove(&self.key),
        }
    }

    pub fn redirect_target(&self) -> Option<String> {
        self.storage.get(&self.key)
    }

    /// Return the target and clear it; a second call yields `None`
    pub fn consume_redirect_target(&self) -> CoreResult<Option<String>> {
        self.storage.take(&self.key)
    }
}

/// Shared slot for the resolved user identity
#[derive(Debug, Default)]
pub struct IdentityState {
    inner: RwLock<Option<UserIdentity>>,
}

impl IdentityState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<UserIdentity> {
        self.inner.read().ok().and_then(|guard| guard.clone())
    }

    pub fn is_present(&self) -> bool {
        self.inner.read().map(|guard| guard.is_some()).unwrap_or(false)
    }

    pub fn set(&self, identity: Option<UserIdentity>) {
        match self.inner.write() {
            Ok(mut guard) => *guard = identity,
            Err(poisoned) => *poisoned.into_inner() = identity,
        }
    }

    pub fn clear(&self) {
        self.set(None);
    }
}

/// Navigation side effects
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Full path (including query) of the current route
    fn current_path(&self) -> String;

    fn navigate(&self, path: &str);
}

/// Navigator that records history in memory
#[derive(Debug)]
pub struct MemoryNavigator {
    history: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            history: Mutex::new(vec![initial_path.into()]),
        }
    }

    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.history
            .lock()
            .ok()
            .and_then(|history| history.last().cloned())
            .unwrap_or_else(|| "/".to_string())
    }

    fn navigate(&self, path: &str) {
        if let Ok(mut history) = self.history.lock() {
            history.push(path.to_string());
        }
    }
}

/// Session state handed to the HTTP client and route guard constructors
pub struct AuthContext {
    tokens: TokenStore,
    redirect: RedirectState,
    identity: IdentityState,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl AuthContext {
    pub fn new(
        config: &AuthConfig,
        cookies: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            tokens: TokenStore::new(
                cookies,
                config.access_token_cookie.clone(),
                config.refresh_token_cookie.clone(),
            ),
            redirect: RedirectState::new(session, config.redirect_session_key.clone()),
            identity: IdentityState::new(),
            navigator,
            login_path: config.login_path.clone(),
        }
    }

    /// Context backed entirely by in-memory storage
    pub fn in_memory(config: &AuthConfig, navigator: Arc<dyn Navigator>) -> Self {
        Self::new(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            navigator,
        )
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn redirect(&self) -> &RedirectState {
        &self.redirect
    }

    pub fn identity(&self) -> &IdentityState {
        &self.identity
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Clear identity and credentials; safe to call when already logged out
    pub fn logout(&self) {
        self.identity.clear();
        if let Err(error) = self.tokens.clear() {
            warn!(%error, "Failed to clear credentials");
        }
        info!("Logged out");
    }

    /// Remember the current route and send the user to the login entry point
    pub fn redirect_to_login(&self) {
        let current = self.navigator.current_path();
        if let Err(error) = self.redirect.set_redirect_target(Some(&current)) {
            warn!(%error, "Failed to save redirect target");
        }
        info!(from = %current, to = %self.login_path, "Redirecting to login");
        self.navigator.navigate(&self.login_path);
    }
}
