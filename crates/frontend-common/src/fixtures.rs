//! Development fixtures answered in mock mode
//!
//! Anything not listed here passes through to the real backend.

use chrono::Local;
use reqwest::Method;
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use trabuddy_core::date::serialize_date;
use trabuddy_http::{MockRequest, MockResponse, MockTransport};

/// Longest text value the plan update fixture accepts
const MAX_FIXTURE_TEXT: usize = 30;

fn now() -> String {
    serialize_date(&Local::now().naive_local())
}

fn body(req: &MockRequest) -> JsonValue {
    req.body.clone().unwrap_or(JsonValue::Null)
}

fn numeric_param(req: &MockRequest, name: &str) -> i64 {
    req.param(name).and_then(|value| value.parse().ok()).unwrap_or_default()
}

fn attractions() -> JsonValue {
    json!([
        {
            "attractionId": 0,
            "address1": "608 Eonju-ro, Gangnam-gu, Seoul",
            "category1": "A05",
            "category2": "A0502",
            "category3": "A05020100",
            "contentId": "2871024",
            "contentTypeId": "39",
            "firstImageUrl": "http://tong.visitkorea.or.kr/cms/resource/08/2871008_image2_1.JPG",
            "firstImageThumbnailUrl": "http://tong.visitkorea.or.kr/cms/resource/08/2871008_image3_1.JPG",
            "latitude": "37.5099674377",
            "longitude": "127.0377755568",
            "title": "Gana Donkatsu"
        },
        {
            "attractionId": 1,
            "address1": "28 Pyeongchang 30-gil, Jongno-gu, Seoul",
            "address2": "(Pyeongchang-dong)",
            "category1": "A02",
            "category2": "A0206",
            "category3": "A02060500",
            "contentId": "129854",
            "contentTypeId": "14",
            "firstImageUrl": "http://tong.visitkorea.or.kr/cms/resource/19/1570619_image2_1.jpg",
            "firstImageThumbnailUrl": "http://tong.visitkorea.or.kr/cms/resource/19/1570619_image3_1.jpg",
            "latitude": "37.6122099878",
            "longitude": "126.9751811398",
            "title": "Gana Art Center"
        }
    ])
}

fn plan_fixtures(point_ids: Arc<AtomicI64>) -> MockTransport {
    MockTransport::new()
        .on(Method::POST, "/api/v1/plans", |req| {
            MockResponse::json(&json!({
                "planId": 10,
                "title": body(req)["title"],
                "createdAt": now(),
            }))
        })
        // Must precede the `:planId` patterns
        .on(Method::GET, "/api/v1/plans/join", |_| {
            MockResponse::json(&json!({
                "nickname": "Dreaming Lion",
                "title": "Unplanned Jeju trip",
            }))
        })
        .on(Method::POST, "/api/v1/plans/join", |_| MockResponse::empty())
        .on(Method::GET, "/api/v1/plans/:planId", |req| {
            MockResponse::json(&json!({
                "planId": numeric_param(req, "planId"),
                "themeId": 0,
                "ownerId": 1,
                "title": "",
                "description": "",
                "memo": "",
                "people": 1,
                "createdAt": now(),
                "visibility": "private",
                "startDate": now(),
                "endDate": now(),
            }))
        })
        .on(Method::PATCH, "/api/v1/plans/:planId", |req| {
            let body = body(req);
            let too_long = body.as_object().is_some_and(|fields| {
                fields
                    .values()
                    .filter_map(JsonValue::as_str)
                    .any(|text| text.chars().count() > MAX_FIXTURE_TEXT)
            });
            if too_long {
                return MockResponse::json(&json!({
                    "message": format!("text longer than {MAX_FIXTURE_TEXT} characters")
                }))
                .with_status(400);
            }
            MockResponse::json(&json!({"message": "Plan updated"}))
        })
        .on(Method::GET, "/api/v1/plans/:planId/participants", |_| {
            MockResponse::json(&json!([
                {"userId": 1, "nickname": "Kim Younggyu", "role": "owner"},
                {"userId": 2, "nickname": "Kim Yeohaeng", "role": "owner"},
                {"userId": 3, "nickname": "Park Mohum", "role": "member"},
            ]))
        })
        .on(Method::PATCH, "/api/v1/plans/:planId/participants/:userId", |req| {
            MockResponse::json(&json!({
                "userId": numeric_param(req, "userId"),
                "role": body(req)["role"],
            }))
        })
        .on(Method::DELETE, "/api/v1/plans/:planId/participants/:userId", |_| {
            MockResponse::empty()
        })
        .on(Method::PUT, "/api/v1/plans/:planId/nickname/:userId", |req| {
            MockResponse::json(&json!({
                "userId": numeric_param(req, "userId"),
                "nickname": body(req)["nickname"],
            }))
        })
        .on(Method::POST, "/api/v1/plans/:planId/invite", |_| {
            MockResponse::json(&json!({
                "inviteCode": "123456",
                "validUntil": "2025-06-27 10:00:00",
            }))
        })
        .on(Method::GET, "/api/v1/plans/:planId/points", |_| {
            let attraction = attractions()[0].clone();
            MockResponse::json(&json!([
                {
                    "pointId": 1,
                    "from": "2025-06-01 10:00:00",
                    "to": "2025-06-01 12:00:00",
                    "attraction": attraction,
                }
            ]))
        })
        .on(Method::POST, "/api/v1/plans/:planId/points", move |req| {
            let body = body(req);
            MockResponse::json(&json!({
                "pointId": point_ids.fetch_add(1, Ordering::Relaxed),
                "attractionId": body["attractionId"],
                "from": body["from"],
                "to": body["to"],
            }))
        })
        .on(Method::PATCH, "/api/v1/plans/:planId/points/:pointId", |_| {
            MockResponse::empty()
        })
        .on(Method::DELETE, "/api/v1/plans/:planId/points/:pointId", |_| {
            MockResponse::empty()
        })
}

fn user_and_tour_fixtures() -> MockTransport {
    MockTransport::new()
        .on(Method::GET, "/api/v1/users/profile", |_| {
            MockResponse::json(&json!({"userId": 1, "nickname": "Kim Younggyu"}))
        })
        // Refresh always fails in mock mode
        .on(Method::POST, "/api/v1/auth/refresh", |_| {
            MockResponse::json(&json!({"message": "refresh"})).with_status(401)
        })
        .on(Method::GET, "/api/v1/attractions/areas", |req| {
            match req.query_param("areaCode") {
                Some(_) => MockResponse::json(&json!([
                    {"areaCode": 1, "sigunguCode": 1, "name": "Gyeonggi-do"}
                ])),
                None => MockResponse::json(&json!([{"areaCode": 1, "name": "Seoul"}])),
            }
        })
        .on(Method::GET, "/api/v1/attractions", |_| {
            let content = attractions();
            let total = content.as_array().map_or(0, Vec::len);
            MockResponse::json(&json!({
                "content": content,
                "size": 10,
                "page": 1,
                "totalElements": total,
                "totalPages": 1,
            }))
        })
}

/// Fixture set used when mock mode is enabled
pub fn default_fixtures() -> MockTransport {
    let point_ids = Arc::new(AtomicI64::new(100));
    plan_fixtures(point_ids).merge(user_and_tour_fixtures())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{PlanService, TourService, UserService};
    use trabuddy_core::{AuthConfig, AuthContext, MemoryNavigator, MemoryStore, ParticipantRole};
    use trabuddy_http::TrabuddyClient;
    use trabuddy_http::types::AttractionQuery;

    fn client() -> TrabuddyClient {
        let context = Arc::new(AuthContext::new(
            &AuthConfig::default(),
            Arc::new(MemoryStore::with_entries([("auth_token", "dev")])),
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryNavigator::default()),
        ));
        TrabuddyClient::new(Arc::new(default_fixtures()), context)
    }

    #[tokio::test]
    async fn join_is_not_mistaken_for_a_plan_id() {
        let info = PlanService::new(client())
            .get_invite_info("123456")
            .await
            .unwrap();
        assert_eq!(info.title, "Unplanned Jeju trip");
    }

    #[tokio::test]
    async fn fixtures_satisfy_the_services() {
        let client = client();
        let plans = PlanService::new(client.clone());
        let tours = TourService::new(client.clone());
        let users = UserService::new(client);

        assert_eq!(plans.get_plan(4).await.unwrap().plan_id, 4);
        assert_eq!(plans.get_points(4).await.unwrap().len(), 1);
        assert_eq!(
            plans
                .update_participant(4, 3, ParticipantRole::Owner)
                .await
                .unwrap(),
            ParticipantRole::Owner
        );
        assert_eq!(
            tours
                .get_attractions(&AttractionQuery::default())
                .await
                .unwrap()
                .total_elements,
            2
        );
        assert_eq!(users.get_user_info().await.unwrap().user_id, 1);
    }

    #[tokio::test]
    async fn plan_update_rejects_long_text() {
        let update = crate::services::PlanUpdate {
            title: Some("x".repeat(MAX_FIXTURE_TEXT + 1)),
            ..Default::default()
        };
        let error = PlanService::new(client())
            .update_plan(1, &update)
            .await
            .unwrap_err();
        assert_eq!(error.status(), Some(400));
    }

    #[tokio::test]
    async fn created_points_get_fresh_ids() {
        let plans = PlanService::new(client());
        let start = Local::now().naive_local();
        let first = plans.add_point(1, 7, &start, &start).await.unwrap();
        let second = plans.add_point(1, 7, &start, &start).await.unwrap();
        assert_ne!(first.point_id, second.point_id);
        assert_eq!(first.attraction_id, 7);
    }
}
