//! Area and attraction lookups

use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, warn};
use trabuddy_core::{AreaItem, AttractionItem, Pagination};
use trabuddy_http::types::AttractionQuery;
use trabuddy_http::{ClientError, TrabuddyClient};

/// Attraction search and area listings
#[derive(Clone)]
pub struct TourService {
    client: TrabuddyClient,
}

impl TourService {
    pub fn new(client: TrabuddyClient) -> Self {
        Self { client }
    }

    pub async fn get_sido(&self) -> Result<Vec<AreaItem>, ClientError> {
        self.client.get_sido().await
    }

    pub async fn get_sigungu(&self, area_code: &str) -> Result<Vec<AreaItem>, ClientError> {
        self.client.get_sigungu(area_code).await
    }

    pub async fn get_attractions(
        &self,
        query: &AttractionQuery,
    ) -> Result<Pagination<AttractionItem>, ClientError> {
        self.client.get_attractions(query).await
    }
}

/// Area lists fetched once per session
///
/// Area data never changes while the app runs, so lists are kept after the
/// first successful fetch. Failed fetches are not cached.
pub struct AreaCache {
    tours: TourService,
    sido: RwLock<Option<Vec<AreaItem>>>,
    sigungu: RwLock<HashMap<String, Vec<AreaItem>>>,
}

impl AreaCache {
    pub fn new(tours: TourService) -> Self {
        Self {
            tours,
            sido: RwLock::new(None),
            sigungu: RwLock::new(HashMap::new()),
        }
    }

    /// Province list, fetched on first use
    pub async fn fetch_sido_list(&self) -> Result<Vec<AreaItem>, ClientError> {
        if let Some(cached) = self.sido.read().ok().and_then(|sido| sido.clone()) {
            return Ok(cached);
        }

        let list = self.tours.get_sido().await.inspect_err(|error| {
            warn!(%error, "Failed to fetch sido list");
        })?;
        debug!(count = list.len(), "Cached sido list");
        if let Ok(mut sido) = self.sido.write() {
            *sido = Some(list.clone());
        }
        Ok(list)
    }

    /// District list for one province; an empty area code yields nothing
    pub async fn fetch_sigungu_list(&self, area_code: &str) -> Result<Vec<AreaItem>, ClientError> {
        if area_code.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(cached) = self.cached_sigungu(area_code) {
            return Ok(cached);
        }

        let list = self.tours.get_sigungu(area_code).await.inspect_err(|error| {
            warn!(%error, area_code, "Failed to fetch sigungu list");
        })?;
        debug!(count = list.len(), area_code, "Cached sigungu list");
        if let Ok(mut sigungu) = self.sigungu.write() {
            sigungu.insert(area_code.to_string(), list.clone());
        }
        Ok(list)
    }

    /// Districts already fetched for a province, without touching the network
    pub fn sigungu_list_by_sido(&self, area_code: &str) -> Vec<AreaItem> {
        self.cached_sigungu(area_code).unwrap_or_default()
    }

    fn cached_sigungu(&self, area_code: &str) -> Option<Vec<AreaItem>> {
        self.sigungu
            .read()
            .ok()
            .and_then(|sigungu| sigungu.get(area_code).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use serde_json::json;
    use std::sync::Arc;
    use trabuddy_core::{AuthConfig, AuthContext, MemoryNavigator};
    use trabuddy_http::{MockResponse, MockTransport};

    fn cache(mock: &MockTransport) -> AreaCache {
        let context = Arc::new(AuthContext::in_memory(
            &AuthConfig::default(),
            Arc::new(MemoryNavigator::default()),
        ));
        let client = TrabuddyClient::new(Arc::new(mock.clone()), context);
        AreaCache::new(TourService::new(client))
    }

    fn area_fixtures() -> MockTransport {
        MockTransport::new().on(Method::GET, "/api/v1/attractions/areas", |req| {
            match req.query_param("areaCode") {
                Some(code) => MockResponse::json(&json!([
                    {"areaCode": code, "sigunguCode": 1, "name": "Jung-gu"},
                    {"areaCode": code, "sigunguCode": 2, "name": "Seo-gu"}
                ])),
                None => MockResponse::json(&json!([
                    {"areaCode": 1, "name": "Seoul"},
                    {"areaCode": 6, "name": "Busan"}
                ])),
            }
        })
    }

    #[tokio::test]
    async fn sido_list_is_fetched_once() {
        let mock = area_fixtures();
        let areas = cache(&mock);

        let first = areas.fetch_sido_list().await.unwrap();
        let second = areas.fetch_sido_list().await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn sigungu_lists_are_cached_per_area() {
        let mock = area_fixtures();
        let areas = cache(&mock);

        assert!(areas.sigungu_list_by_sido("6").is_empty());
        areas.fetch_sigungu_list("6").await.unwrap();
        areas.fetch_sigungu_list("6").await.unwrap();
        areas.fetch_sigungu_list("1").await.unwrap();

        assert_eq!(areas.sigungu_list_by_sido("6")[1].name, "Seo-gu");
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn empty_area_code_is_ignored() {
        let mock = area_fixtures();
        let areas = cache(&mock);

        assert!(areas.fetch_sigungu_list("").await.unwrap().is_empty());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let mock = MockTransport::new();
        let areas = cache(&mock);

        assert!(areas.fetch_sido_list().await.is_err());
        assert!(areas.fetch_sido_list().await.is_err());
        assert_eq!(mock.calls().len(), 2);
    }
}
