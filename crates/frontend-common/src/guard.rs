//! Navigation guard
//!
//! Runs before every route change. It loads the user identity when tokens
//! are present, keeps anonymous users out of protected routes while
//! remembering where they were headed, and sends them back there once they
//! land on the home page.
//!
//! Identity loading runs through a client that never navigates on its own.
//! If a rejected refresh ends the session mid-navigation, the guard itself
//! sends the user home, so each navigation has exactly one outcome.

use crate::router::{HOME_PATH, Location, NavigationDecision, Route};
use crate::services::UserService;
use std::sync::Arc;
use tracing::{debug, info, warn};
use trabuddy_core::AuthContext;

/// Upper bound on chained redirects resolved by [`RouteGuard::navigate`]
const MAX_REDIRECTS: usize = 8;

/// Per-hop verdict, distinguishing the terminal login redirect
#[derive(Debug, Clone, PartialEq, Eq)]
enum Verdict {
    Proceed,
    Redirect(String),
    /// Destination remembered; land on the login entry point without
    /// evaluating it as a fresh navigation
    LoginRequired,
}

impl From<Verdict> for NavigationDecision {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Proceed => NavigationDecision::Proceed,
            Verdict::Redirect(target) => NavigationDecision::Redirect(target),
            Verdict::LoginRequired => NavigationDecision::Redirect(HOME_PATH.to_string()),
        }
    }
}

pub struct RouteGuard {
    context: Arc<AuthContext>,
    users: UserService,
}

impl RouteGuard {
    pub fn new(context: Arc<AuthContext>, users: &UserService) -> Self {
        Self {
            context,
            users: users.without_login_redirect(),
        }
    }

    /// Decide whether navigation to `to` may proceed
    pub async fn before_each(&self, to: &str) -> NavigationDecision {
        self.decide(to).await.into()
    }

    async fn decide(&self, to: &str) -> Verdict {
        let location = Location::parse(to);
        let route = location.route();

        if let Some(target) = route.as_ref().and_then(Route::redirect) {
            return Verdict::Redirect(target);
        }

        if let Err(error) = self.users.retrieve_user_info_if_possible().await {
            // A failed refresh has already logged out; nothing is left to hydrate
            if error.is_unauthorized() && !self.context.tokens().has_any_token() {
                warn!(
                    %error,
                    destination = %location.full_path(),
                    "Session expired during navigation"
                );
                if route.as_ref().is_some_and(Route::requires_auth) {
                    self.remember(&location);
                }
                return Verdict::LoginRequired;
            }
            warn!(%error, "Could not load user identity; continuing anonymously");
        }

        match route {
            Some(route) if route.requires_auth() && !self.context.identity().is_present() => {
                info!(route = route.name(), "Authentication required; remembering destination");
                self.remember(&location);
                Verdict::LoginRequired
            }
            Some(Route::Home) => match self.context.redirect().consume_redirect_target() {
                Ok(Some(target)) => {
                    debug!(%target, "Resuming navigation after login");
                    Verdict::Redirect(target)
                }
                Ok(None) => Verdict::Proceed,
                Err(error) => {
                    warn!(%error, "Failed to read redirect target");
                    Verdict::Proceed
                }
            },
            _ => Verdict::Proceed,
        }
    }

    fn remember(&self, location: &Location) {
        let target = location.full_path();
        if let Err(error) = self.context.redirect().set_redirect_target(Some(&target)) {
            warn!(%error, %target, "Failed to store redirect target");
        }
    }

    /// Follow guard redirects for `to` and commit the final location
    ///
    /// A login redirect ends the chain on the home page, so the remembered
    /// destination survives until the next visit to it. Returns the path
    /// that was navigated to.
    pub async fn navigate(&self, to: &str) -> String {
        let mut current = to.to_string();
        for _ in 0..MAX_REDIRECTS {
            match self.decide(&current).await {
                Verdict::Proceed => break,
                Verdict::LoginRequired => {
                    current = HOME_PATH.to_string();
                    break;
                }
                Verdict::Redirect(next) => {
                    debug!(from = %current, to = %next, "Guard redirected navigation");
                    current = next;
                }
            }
        }
        self.context.navigator().navigate(&current);
        current
    }
}
