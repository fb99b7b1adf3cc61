//! Authentication API client methods

use super::{ClientError, TrabuddyClient};
use reqwest::Method;

/// Endpoint that exchanges the refresh cookie for new token cookies
pub const REFRESH_PATH: &str = "/api/v1/auth/refresh";

impl TrabuddyClient {
    /// Explicitly refresh the access token
    ///
    /// Unlike the automatic recovery this reports the failure and does not
    /// navigate; credentials are still cleared when the refresh is rejected.
    pub async fn refresh_auth_token(&self) -> Result<(), ClientError> {
        match self.refresh_tokens().await {
            Ok(()) => Ok(()),
            Err(failure) => {
                self.context().logout();
                Err(failure.into())
            }
        }
    }

    /// Forget the current session locally
    pub fn logout(&self) {
        self.context().logout();
    }

    /// Request description for the refresh endpoint
    pub fn refresh_request(&self) -> super::PendingRequest {
        self.request(Method::POST, REFRESH_PATH)
    }
}
