//! Application wiring
//!
//! Builds the session context, transport, client, services and route guard
//! from configuration and a platform, and hands them back as one value.

use crate::fixtures::default_fixtures;
use crate::guard::RouteGuard;
use crate::services::{AreaCache, PlanService, TourService, UserService};
use std::sync::Arc;
use tracing::info;
use trabuddy_core::{
    AuthContext, ClientConfig, KeyValueStore, MemoryNavigator, MemoryStore, Navigator,
};
use trabuddy_http::{ClientError, TrabuddyClient, Transport};

/// Environment-specific storage, navigation and transport
pub struct Platform {
    pub cookies: Arc<dyn KeyValueStore>,
    pub session: Arc<dyn KeyValueStore>,
    pub navigator: Arc<dyn Navigator>,
    /// Overrides the HTTP transport built from configuration
    pub transport: Option<Arc<dyn Transport>>,
}

impl Platform {
    /// Everything in memory, starting at `initial_path`
    pub fn in_memory(initial_path: &str) -> Self {
        Self {
            cookies: Arc::new(MemoryStore::new()),
            session: Arc::new(MemoryStore::new()),
            navigator: Arc::new(MemoryNavigator::new(initial_path)),
            transport: None,
        }
    }

    /// Cookies, `sessionStorage` and the History API of the current page
    #[cfg(target_arch = "wasm32")]
    pub fn browser() -> Self {
        use crate::browser::{BrowserNavigator, CookieStore, SessionStore};

        Self {
            cookies: Arc::new(CookieStore),
            session: Arc::new(SessionStore),
            navigator: Arc::new(BrowserNavigator),
            transport: None,
        }
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }
}

/// Fully wired client application
pub struct TrabuddyApp {
    config: ClientConfig,
    context: Arc<AuthContext>,
    client: TrabuddyClient,
    users: UserService,
    plans: PlanService,
    tours: TourService,
    areas: Arc<AreaCache>,
    guard: RouteGuard,
}

/// Browsers need an absolute URL; an empty base means the page's origin
#[cfg(target_arch = "wasm32")]
fn resolve_base_url(config: &mut ClientConfig) {
    if config.api.base_url.is_empty()
        && let Some(origin) = web_sys::window().and_then(|window| window.location().origin().ok())
    {
        config.api.base_url = origin;
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn resolve_base_url(_config: &mut ClientConfig) {}

impl TrabuddyApp {
    pub fn new(mut config: ClientConfig, platform: Platform) -> Result<Self, ClientError> {
        config.validate()?;
        resolve_base_url(&mut config);

        let context = Arc::new(AuthContext::new(
            &config.auth,
            platform.cookies,
            platform.session,
            platform.navigator,
        ));

        let mut builder = TrabuddyClient::builder()
            .config(&config.api)
            .context(context.clone());
        if let Some(transport) = platform.transport {
            builder = builder.transport(transport);
        }
        if config.api.mock {
            info!("Mock mode enabled; unmatched requests go to the backend");
            builder = builder.mock(default_fixtures());
        }
        let client = builder.build()?;

        let users = UserService::new(client.clone());
        let tours = TourService::new(client.clone());
        let app = Self {
            plans: PlanService::new(client.clone()),
            areas: Arc::new(AreaCache::new(tours.clone())),
            guard: RouteGuard::new(context.clone(), &users),
            users,
            tours,
            client,
            context,
            config,
        };
        info!(base_url = %app.config.api.base_url, "Trabuddy client ready");
        Ok(app)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn context(&self) -> &Arc<AuthContext> {
        &self.context
    }

    pub fn client(&self) -> &TrabuddyClient {
        &self.client
    }

    pub fn users(&self) -> &UserService {
        &self.users
    }

    pub fn plans(&self) -> &PlanService {
        &self.plans
    }

    pub fn tours(&self) -> &TourService {
        &self.tours
    }

    pub fn areas(&self) -> &Arc<AreaCache> {
        &self.areas
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    /// Guarded navigation; returns where the user ended up
    pub async fn navigate(&self, to: &str) -> String {
        self.guard.navigate(to).await
    }

    pub fn logout(&self) {
        self.context.logout();
    }
}
