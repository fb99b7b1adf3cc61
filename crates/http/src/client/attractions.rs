//! Attraction search client methods

use super::{ClientError, TrabuddyClient};
use crate::types::AttractionQuery;
use reqwest::Method;
use trabuddy_core::{AreaItem, AttractionItem, Pagination};

impl TrabuddyClient {
    /// Province-level areas
    pub async fn get_sido(&self) -> Result<Vec<AreaItem>, ClientError> {
        self.execute(self.request(Method::GET, "/api/v1/attractions/areas"))
            .await
    }

    /// Districts within one province
    pub async fn get_sigungu(&self, area_code: &str) -> Result<Vec<AreaItem>, ClientError> {
        let request = self
            .request(Method::GET, "/api/v1/attractions/areas")
            .query("areaCode", Some(area_code));
        self.execute(request).await
    }

    /// Paged attraction search
    pub async fn get_attractions(
        &self,
        query: &AttractionQuery,
    ) -> Result<Pagination<AttractionItem>, ClientError> {
        let request = self
            .request(Method::GET, "/api/v1/attractions")
            .query("areaCode", query.sido_code.as_deref())
            .query("sigunguCode", query.sigungu_code.as_deref())
            .query("contentTypeId", query.content_type_id.as_deref())
            .query("page", query.page)
            .query("size", query.size)
            .query("keyword", query.keyword.as_deref());
        self.execute(request).await
    }
}
