//! End-to-end navigation and session scenarios through the wired app

use mockall::mock;
use mockall::predicate::eq;
use reqwest::Method;
use serde_json::json;
use std::sync::Arc;
use trabuddy_core::{
    ClientConfig, Credentials, MemoryNavigator, MemoryStore, Navigator, UserIdentity,
};
use trabuddy_frontend_common::{NavigationDecision, Platform, TrabuddyApp};
use trabuddy_http::{ClientError, MockResponse, MockTransport};

mock! {
    pub Nav {}

    impl Navigator for Nav {
        fn current_path(&self) -> String;
        fn navigate(&self, path: &str);
    }
}

/// Backend that only knows the user when an access token cookie is sent
fn backend() -> MockTransport {
    MockTransport::new()
        .on(Method::GET, "/api/v1/users/profile", |req| {
            let authenticated = req
                .cookie
                .as_deref()
                .is_some_and(|cookie| cookie.contains("auth_token="));
            if authenticated {
                MockResponse::json(&json!({"userId": 21, "nickname": "wanderer"}))
            } else {
                MockResponse::empty().with_status(401)
            }
        })
        .on(Method::POST, "/api/v1/auth/refresh", |_| {
            MockResponse::json(&json!({"message": "refresh"})).with_status(401)
        })
}

fn app(backend: &MockTransport, initial_path: &str) -> TrabuddyApp {
    let platform = Platform::in_memory(initial_path).with_transport(Arc::new(backend.clone()));
    TrabuddyApp::new(ClientConfig::default(), platform).unwrap()
}

fn log_in(app: &TrabuddyApp) {
    app.context()
        .tokens()
        .store(&Credentials {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
        })
        .unwrap();
}

#[tokio::test]
async fn protected_page_resumes_after_login() {
    let backend = backend();
    let app = app(&backend, "/");

    assert_eq!(app.navigate("/my-page").await, "/");
    assert_eq!(
        app.context().redirect().redirect_target().as_deref(),
        Some("/my-page")
    );

    log_in(&app);
    assert_eq!(app.navigate("/").await, "/my-page");
    assert_eq!(app.context().navigator().current_path(), "/my-page");
    assert_eq!(app.context().redirect().redirect_target(), None);
    assert_eq!(
        app.context().identity().get(),
        Some(UserIdentity {
            user_id: 21,
            nickname: "wanderer".into()
        })
    );

    // A later visit home stays home
    assert_eq!(app.navigate("/").await, "/");
}

#[tokio::test]
async fn rejected_refresh_clears_session_and_forces_home() {
    let backend = backend().on(Method::GET, "/api/v1/users/likes", |_| {
        MockResponse::empty().with_status(401)
    });

    let mut navigator = MockNav::new();
    navigator
        .expect_current_path()
        .return_const("/my-page".to_string());
    navigator
        .expect_navigate()
        .with(eq("/"))
        .times(1)
        .return_const(());

    let platform = Platform {
        cookies: Arc::new(MemoryStore::new()),
        session: Arc::new(MemoryStore::new()),
        navigator: Arc::new(navigator),
        transport: Some(Arc::new(backend.clone())),
    };
    let app = TrabuddyApp::new(ClientConfig::default(), platform).unwrap();
    log_in(&app);
    app.context().identity().set(Some(UserIdentity {
        user_id: 21,
        nickname: "wanderer".into(),
    }));

    let error = app.users().get_my_likes().await.unwrap_err();

    assert!(error.is_unauthorized());
    assert!(app.context().tokens().credentials().is_none());
    assert!(!app.context().identity().is_present());
    assert_eq!(backend.call_count(&Method::POST, "/api/v1/auth/refresh"), 1);
}

/// Backend whose sessions have all expired
fn expired_backend() -> MockTransport {
    MockTransport::new()
        .on(Method::GET, "/api/v1/users/profile", |_| {
            MockResponse::empty().with_status(401)
        })
        .on(Method::POST, "/api/v1/auth/refresh", |_| {
            MockResponse::empty().with_status(401)
        })
}

#[tokio::test]
async fn expired_session_during_navigation_lands_home_once() {
    let backend = expired_backend();
    let navigator = Arc::new(MemoryNavigator::new("/search"));
    let platform = Platform {
        cookies: Arc::new(MemoryStore::new()),
        session: Arc::new(MemoryStore::new()),
        navigator: navigator.clone(),
        transport: Some(Arc::new(backend.clone())),
    };
    let app = TrabuddyApp::new(ClientConfig::default(), platform).unwrap();
    log_in(&app);

    assert_eq!(app.navigate("/plan/3").await, "/");
    assert_eq!(navigator.history(), vec!["/search".to_string(), "/".to_string()]);
    assert_eq!(app.context().redirect().redirect_target(), None);
    assert!(!app.context().tokens().has_any_token());
    assert_eq!(backend.call_count(&Method::POST, "/api/v1/auth/refresh"), 1);

    // Nothing stale is waiting on the next home visit
    assert_eq!(app.navigate("/").await, "/");
}

#[tokio::test]
async fn expired_session_on_protected_route_remembers_destination() {
    let mut navigator = MockNav::new();
    navigator
        .expect_current_path()
        .return_const("/search".to_string());
    navigator
        .expect_navigate()
        .with(eq("/"))
        .times(1)
        .return_const(());

    let backend = expired_backend();
    let platform = Platform {
        cookies: Arc::new(MemoryStore::new()),
        session: Arc::new(MemoryStore::new()),
        navigator: Arc::new(navigator),
        transport: Some(Arc::new(backend.clone())),
    };
    let app = TrabuddyApp::new(ClientConfig::default(), platform).unwrap();
    log_in(&app);

    assert_eq!(app.navigate("/my-page").await, "/");
    assert_eq!(
        app.context().redirect().redirect_target().as_deref(),
        Some("/my-page")
    );
    assert!(app.context().tokens().credentials().is_none());
}

#[tokio::test]
async fn invite_link_lands_on_home_with_code() {
    let backend = backend();
    let app = app(&backend, "/");

    assert_eq!(app.navigate("/invite/Q1W2").await, "/?inviteCode=Q1W2");
    assert_eq!(
        app.guard().before_each("/?inviteCode=Q1W2").await,
        NavigationDecision::Proceed
    );
}

#[tokio::test]
async fn logout_is_idempotent() {
    let backend = backend();
    let app = app(&backend, "/");
    log_in(&app);
    app.navigate("/my-page").await;
    assert!(app.context().identity().is_present());

    app.logout();
    app.logout();

    assert!(!app.context().tokens().has_any_token());
    assert!(!app.context().identity().is_present());
    assert_eq!(app.navigate("/my-page").await, "/");
}

#[tokio::test]
async fn mock_mode_serves_fixtures_and_passes_the_rest_through() {
    let backend = MockTransport::new().on(Method::GET, "/api/v1/users/my-joins", |_| {
        MockResponse::json(&json!([]))
    });
    let mut config = ClientConfig::default();
    config.api.mock = true;
    let platform = Platform::in_memory("/").with_transport(Arc::new(backend.clone()));
    let app = TrabuddyApp::new(config, platform).unwrap();

    let areas = app.areas().fetch_sido_list().await.unwrap();
    assert_eq!(areas[0].name, "Seoul");
    assert!(app.users().get_my_joins().await.unwrap().is_empty());
    assert_eq!(backend.calls().len(), 1);
}

#[tokio::test]
async fn invalid_configuration_is_rejected() {
    let mut config = ClientConfig::default();
    config.api.timeout_ms = 0;
    let result = TrabuddyApp::new(config, Platform::in_memory("/"));
    assert!(matches!(result, Err(ClientError::Core(_))));
}
