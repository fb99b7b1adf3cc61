//! Client configuration
//!
//! Values are layered the usual way: built-in defaults, then an optional
//! `trabuddy.toml`, then `TRABUDDY__SECTION__KEY` environment variables.

use crate::error::{CoreError, CoreResult};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment prefix for overrides, e.g. `TRABUDDY__API__BASE_URL`
pub const ENV_PREFIX: &str = "TRABUDDY";

/// Top-level client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Credential and session storage settings
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend origin; empty means same origin as the page
    #[serde(default)]
    pub base_url: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Answer requests from in-process fixtures before touching the network
    #[serde(default)]
    pub mock: bool,
}

/// Credential and session storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_access_token_cookie")]
    pub access_token_cookie: String,
    #[serde(default = "default_refresh_token_cookie")]
    pub refresh_token_cookie: String,
    /// Session storage entry holding the post-login redirect target
    #[serde(default = "default_redirect_session_key")]
    pub redirect_session_key: String,
    /// Where users are sent when authentication cannot be recovered
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_ms: default_timeout_ms(),
            mock: false,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_cookie: default_access_token_cookie(),
            refresh_token_cookie: default_refresh_token_cookie(),
            redirect_session_key: default_redirect_session_key(),
            login_path: default_login_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    3000
}

fn default_access_token_cookie() -> String {
    "auth_token".to_string()
}

fn default_refresh_token_cookie() -> String {
    "refresh_token".to_string()
}

fn default_redirect_session_key() -> String {
    "user-auth-session".to_string()
}

fn default_login_path() -> String {
    "/".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ClientConfig {
    /// Load configuration from environment and files
    pub fn load() -> CoreResult<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        for path in ["trabuddy.toml", "config/trabuddy.toml"] {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific config file
    pub fn load_from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the client cannot operate with
    pub fn validate(&self) -> CoreResult<()> {
        if self.api.timeout_ms == 0 {
            return Err(CoreError::invalid_config("api.timeout_ms must be positive"));
        }
        let keys = [
            ("auth.access_token_cookie", &self.auth.access_token_cookie),
            ("auth.refresh_token_cookie", &self.auth.refresh_token_cookie),
            ("auth.redirect_session_key", &self.auth.redirect_session_key),
        ];
        for (name, value) in keys {
            if value.trim().is_empty() {
                return Err(CoreError::invalid_config(format!("{name} must not be empty")));
            }
        }
        if !self.auth.login_path.starts_with('/') {
            return Err(CoreError::invalid_config("auth.login_path must be absolute"));
        }
        Ok(())
    }
}
