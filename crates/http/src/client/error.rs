//! Client error types

use thiserror::Error;
use trabuddy_core::CoreError;

/// Client error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Timeout, connection failure or other transport problem
    #[error("Network error: {message}")]
    Network { message: String, timeout: bool },

    /// Server answered with a non-2xx status
    #[error("Server returned {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Token refresh could not recover the session
    #[error("Token refresh failed: {0}")]
    RefreshFailure(#[from] RefreshFailure),

    /// Response body did not match the expected shape
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Local storage or parsing failure
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Why a silent token refresh failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshFailure {
    #[error("no refresh token available")]
    MissingRefreshToken,

    #[error("refresh endpoint rejected the request with {status}")]
    Rejected { status: u16, body: String },

    #[error("refresh request did not complete: {0}")]
    Network(String),
}

impl ClientError {
    /// Create error from HTTP status code
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            timeout: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            timeout: true,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network { timeout: true, .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Serialization(err.to_string());
        }
        Self::Network {
            timeout: err.is_timeout(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<ClientError> for RefreshFailure {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::HttpStatus { status, body } => Self::Rejected { status, body },
            ClientError::RefreshFailure(inner) => inner,
            other => Self::Network(other.to_string()),
        }
    }
}
