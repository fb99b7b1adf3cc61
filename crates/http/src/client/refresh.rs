//! Silent recovery from expired access tokens
//!
//! A request that fails with 401 on its first attempt triggers one call to
//! the refresh endpoint. If the refresh succeeds the request is replayed once
//! and the replay's outcome is final. If there is no refresh token, or the
//! refresh fails, the current route is saved as the redirect target, the user
//! is sent to the login entry point, and the caller receives the original 401.
//!
//! A client built with [`TrabuddyClient::without_login_redirect`] still clears
//! the session on a failed refresh but leaves navigation to its caller.
//!
//! Concurrent requests that 401 at the same time each run their own refresh;
//! there is no single-flight de-duplication.

use super::error::{ClientError, RefreshFailure};
use super::transport::{PendingRequest, RawResponse};
use super::TrabuddyClient;
use tracing::{debug, info, warn};

/// What to do after the first attempt of a request failed
#[derive(Debug)]
enum Recovery {
    /// Propagate the error unchanged
    Propagate(ClientError),
    /// Refresh the tokens, then send the replay
    RefreshAndReplay {
        replay: PendingRequest,
        trigger: ClientError,
    },
    /// Send the user to log in and reject with the triggering error
    Redirect(ClientError),
}

impl TrabuddyClient {
    /// Send a request, recovering from one expired access token
    pub async fn dispatch(&self, request: PendingRequest) -> Result<RawResponse, ClientError> {
        let error = match self.send_once(&request).await {
            Ok(response) => return Ok(response),
            Err(error) => error,
        };

        match self.recovery_for(request, error) {
            Recovery::Propagate(error) => Err(error),
            Recovery::Redirect(trigger) => {
                self.redirect_to_login();
                Err(trigger)
            }
            Recovery::RefreshAndReplay { replay, trigger } => match self.refresh_tokens().await {
                Ok(()) => {
                    debug!(path = replay.path(), "Replaying request after token refresh");
                    self.send_once(&replay).await
                }
                Err(failure) => {
                    warn!(%failure, path = replay.path(), "Token refresh failed");
                    self.context().logout();
                    self.redirect_to_login();
                    Err(trigger)
                }
            },
        }
    }

    fn redirect_to_login(&self) {
        if self.login_redirect {
            self.context().redirect_to_login();
        } else {
            debug!("Unrecoverable 401; navigation left to the caller");
        }
    }

    fn recovery_for(&self, request: PendingRequest, error: ClientError) -> Recovery {
        if !error.is_unauthorized() {
            return Recovery::Propagate(error);
        }
        let path = request.path().to_string();
        let Some(replay) = request.into_retry() else {
            debug!(%path, "Replay was rejected again; not refreshing twice");
            return Recovery::Propagate(error);
        };
        if !self.context().tokens().has_refresh_token() {
            info!(%path, "Unauthorized and no refresh token present");
            return Recovery::Redirect(error);
        }
        Recovery::RefreshAndReplay {
            replay,
            trigger: error,
        }
    }

    /// Exchange the refresh token for new credentials
    ///
    /// The refresh call itself is never intercepted, so a 401 from the
    /// refresh endpoint is a terminal [`RefreshFailure`].
    pub async fn refresh_tokens(&self) -> Result<(), RefreshFailure> {
        if !self.context().tokens().has_refresh_token() {
            return Err(RefreshFailure::MissingRefreshToken);
        }
        self.send_once(&self.refresh_request()).await?;
        info!("Access token refreshed");
        Ok(())
    }
}
