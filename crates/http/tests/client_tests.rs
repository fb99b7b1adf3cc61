//! Integration tests for the Trabuddy HTTP client

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use trabuddy_core::{AuthConfig, AuthContext, MemoryNavigator, MemoryStore, Navigator, UserIdentity};
use trabuddy_http::types::{CreatePlanReqDto, GetPlanResDto};
use trabuddy_http::{ClientError, TrabuddyClient};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn context_with_tokens(
    tokens: &[(&str, &str)],
    navigator: Arc<MemoryNavigator>,
) -> Arc<AuthContext> {
    Arc::new(AuthContext::new(
        &AuthConfig::default(),
        Arc::new(MemoryStore::with_entries(tokens.iter().copied())),
        Arc::new(MemoryStore::new()),
        navigator,
    ))
}

fn client_for(server: &MockServer, context: Arc<AuthContext>) -> TrabuddyClient {
    TrabuddyClient::builder()
        .base_url(server.uri())
        .context(context)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_client_builder_requires_context() {
    let result = TrabuddyClient::builder()
        .base_url("http://localhost:8080")
        .build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let context = context_with_tokens(&[], Arc::new(MemoryNavigator::default()));
    let result = TrabuddyClient::builder().context(context).build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_write_requests_send_json_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/plans/3/invite"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "inviteCode": "123456",
            "validUntil": "2025-06-27 10:00:00"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let context = context_with_tokens(&[], Arc::new(MemoryNavigator::default()));
    let client = client_for(&mock_server, context);

    let invite = client.create_invite_code(3).await.unwrap();
    assert_eq!(invite.invite_code, "123456");
}

#[tokio::test]
async fn test_json_body_and_response_decoding() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/plans"))
        .respond_with(|request: &wiremock::Request| {
            let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
            ResponseTemplate::new(200).set_body_json(json!({
                "planId": 10,
                "title": body["title"],
                "createdAt": "2025-06-01 09:00:00"
            }))
        })
        .mount(&mock_server)
        .await;

    let context = context_with_tokens(&[], Arc::new(MemoryNavigator::default()));
    let client = client_for(&mock_server, context);

    let created = client
        .create_plan(&CreatePlanReqDto {
            title: "Jeju".into(),
            start_date: "2025-07-01 00:00:00".into(),
            end_date: "2025-07-03 00:00:00".into(),
            theme_id: 0,
        })
        .await
        .unwrap();
    assert_eq!(created.plan_id, 10);
    assert_eq!(created.title, "Jeju");
}

#[tokio::test]
async fn test_query_parameters_are_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/attractions/areas"))
        .and(query_param("areaCode", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"areaCode": 1, "sigunguCode": 1, "name": "Gangnam-gu"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let context = context_with_tokens(&[], Arc::new(MemoryNavigator::default()));
    let client = client_for(&mock_server, context);

    let areas = client.get_sigungu("1").await.unwrap();
    assert_eq!(areas[0].sigungu_code.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_timeout_is_a_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/profile"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"userId": 1, "nickname": "slow"}))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&mock_server)
        .await;

    let context = context_with_tokens(&[], Arc::new(MemoryNavigator::default()));
    let client = TrabuddyClient::builder()
        .base_url(mock_server.uri())
        .timeout(Duration::from_millis(200))
        .context(context)
        .build()
        .unwrap();

    let error = client.get_user_info().await.unwrap_err();
    assert!(error.is_timeout(), "expected timeout, got {error:?}");
}

#[tokio::test]
async fn test_non_unauthorized_errors_propagate_without_refresh() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/plans/99"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such plan"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let navigator = Arc::new(MemoryNavigator::new("/plan/99"));
    let context = context_with_tokens(&[("refresh_token", "r1")], navigator.clone());
    let client = client_for(&mock_server, context);

    let error = client.get_plan(99).await.unwrap_err();
    assert_eq!(
        error,
        ClientError::HttpStatus {
            status: 404,
            body: "no such plan".into()
        }
    );
    assert_eq!(navigator.history(), vec!["/plan/99".to_string()]);
}

#[tokio::test]
async fn test_cookies_are_sent_and_refreshed_cookie_is_used_on_replay() {
    let mock_server = MockServer::start().await;

    // Replay carries the refreshed access token
    Mock::given(method("GET"))
        .and(path("/api/v1/plans/42"))
        .and(header("cookie", "auth_token=fresh; refresh_token=r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "planId": 42,
            "ownerId": 1,
            "title": "Seoul weekend",
            "visibility": "public"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/plans/42"))
        .and(header("cookie", "auth_token=stale; refresh_token=r1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "auth_token=fresh; Path=/; HttpOnly"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let navigator = Arc::new(MemoryNavigator::new("/plan/42"));
    let context = context_with_tokens(
        &[("auth_token", "stale"), ("refresh_token", "r1")],
        navigator.clone(),
    );
    let client = client_for(&mock_server, context.clone());

    let plan: GetPlanResDto = client.get_plan(42).await.unwrap();
    assert_eq!(plan.title, "Seoul weekend");
    assert_eq!(context.tokens().access_token().as_deref(), Some("fresh"));
    assert_eq!(navigator.history(), vec!["/plan/42".to_string()]);
}

#[tokio::test]
async fn test_second_unauthorized_propagates_without_second_refresh() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/my-plans"))
        .respond_with(ResponseTemplate::new(401).set_body_string("still expired"))
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let navigator = Arc::new(MemoryNavigator::new("/my-page"));
    let context = context_with_tokens(
        &[("auth_token", "a1"), ("refresh_token", "r1")],
        navigator.clone(),
    );
    let client = client_for(&mock_server, context.clone());

    let error = client.get_my_plans().await.unwrap_err();
    assert!(error.is_unauthorized());
    assert_eq!(navigator.history(), vec!["/my-page".to_string()]);
    assert!(context.tokens().has_refresh_token());
}

#[tokio::test]
async fn test_missing_refresh_token_redirects_without_refresh_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/my-page"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let navigator = Arc::new(MemoryNavigator::new("/my-page?tab=likes"));
    let context = context_with_tokens(&[], navigator.clone());
    let client = client_for(&mock_server, context.clone());

    let error = client.get_user_profile().await.unwrap_err();
    assert_eq!(error.status(), Some(401));
    assert_eq!(navigator.current_path(), "/");
    assert_eq!(
        context.redirect().consume_redirect_target().unwrap().as_deref(),
        Some("/my-page?tab=likes")
    );
}

#[tokio::test]
async fn test_rejected_refresh_logs_out_and_redirects_home() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/profile"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "refresh"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let navigator = Arc::new(MemoryNavigator::new("/search"));
    let context = context_with_tokens(
        &[("auth_token", "a1"), ("refresh_token", "r1")],
        navigator.clone(),
    );
    context.identity().set(Some(UserIdentity {
        user_id: 1,
        nickname: "traveler".into(),
    }));
    let client = client_for(&mock_server, context.clone());

    let error = client.get_user_info().await.unwrap_err();
    assert!(error.is_unauthorized());
    assert!(!context.tokens().has_any_token());
    assert!(!context.identity().is_present());
    assert_eq!(navigator.current_path(), "/");
    assert_eq!(
        context.redirect().redirect_target().as_deref(),
        Some("/search")
    );
}

#[tokio::test]
async fn test_explicit_refresh_reports_failure_and_clears_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let navigator = Arc::new(MemoryNavigator::new("/search"));
    let context = context_with_tokens(&[("refresh_token", "r1")], navigator.clone());
    let client = client_for(&mock_server, context.clone());

    let error = client.refresh_auth_token().await.unwrap_err();
    assert!(matches!(error, ClientError::RefreshFailure(_)));
    assert!(!context.tokens().has_refresh_token());
    assert_eq!(navigator.history(), vec!["/search".to_string()]);
}
