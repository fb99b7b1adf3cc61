//! Domain types shared by the client crates

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Authenticated user's identity, present only after a successful profile fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub user_id: i64,
    pub nickname: String,
}

/// Access and refresh token pair held in cookie storage
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Plan visibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Private,
}

/// Role of a participant within a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Owner,
    Member,
}

/// Sex as recorded on a user profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "W")]
    Female,
}

/// Itinerary as presented to views
#[derive(Debug, Clone, PartialEq)]
pub struct PlanItem {
    pub plan_id: i64,
    pub theme_id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub memo: String,
    pub people: u32,
    pub created_at: Option<NaiveDateTime>,
    pub visibility: Visibility,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantItem {
    pub user_id: i64,
    pub nickname: String,
    pub role: ParticipantRole,
}

/// Dated stop within a plan
#[derive(Debug, Clone, PartialEq)]
pub struct PointItem {
    pub point_id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub attraction: AttractionItem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteCodeItem {
    pub invite_code: String,
    pub valid_until: NaiveDateTime,
}

/// Summary shown to someone opening an invitation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteInfoItem {
    pub nickname: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub nickname: String,
    pub age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
}

/// Tourist attraction as returned by the attraction search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttractionItem {
    pub attraction_id: i64,
    #[serde(deserialize_with = "string_or_number")]
    pub content_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub content_type_id: String,
    pub title: String,
    pub address1: String,
    pub address2: String,
    pub category1: String,
    pub category2: String,
    pub category3: String,
    pub first_image_url: String,
    pub first_image_thumbnail_url: String,
    #[serde(deserialize_with = "string_or_number")]
    pub latitude: String,
    #[serde(deserialize_with = "string_or_number")]
    pub longitude: String,
    pub telephone: String,
}

/// Province-level area ("sido") or district ("sigungu")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaItem {
    #[serde(deserialize_with = "string_or_number")]
    pub area_code: String,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub sigungu_code: Option<String>,
    pub name: String,
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination<T> {
    pub content: Vec<T>,
    pub size: u32,
    pub page: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

/// Plan theme choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanTheme {
    pub theme_id: i64,
    pub label: &'static str,
}

impl PlanTheme {
    pub const ALL: [PlanTheme; 6] = [
        PlanTheme { theme_id: 0, label: "None" },
        PlanTheme { theme_id: 1, label: "Healing/Rest" },
        PlanTheme { theme_id: 2, label: "Food Tour" },
        PlanTheme { theme_id: 3, label: "Solo" },
        PlanTheme { theme_id: 4, label: "Unplanned" },
        PlanTheme { theme_id: 5, label: "Leisure/Sports" },
    ];

    pub fn by_id(theme_id: i64) -> Option<PlanTheme> {
        Self::ALL.into_iter().find(|theme| theme.theme_id == theme_id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Int(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn area_codes_accept_numbers_and_strings() {
        let sido: AreaItem = serde_json::from_value(json!({"areaCode": 1, "name": "Seoul"})).unwrap();
        assert_eq!(sido.area_code, "1");
        assert_eq!(sido.sigungu_code, None);

        let sigungu: AreaItem = serde_json::from_value(
            json!({"areaCode": "1", "sigunguCode": 3, "name": "Gangnam-gu"}),
        )
        .unwrap();
        assert_eq!(sigungu.sigungu_code.as_deref(), Some("3"));
    }

    #[test]
    fn attraction_tolerates_missing_fields() {
        let attraction: AttractionItem = serde_json::from_value(json!({
            "attractionId": 3,
            "contentId": "2871024",
            "title": "Gana Art Center",
            "latitude": "37.6122099878",
        }))
        .unwrap();
        assert_eq!(attraction.attraction_id, 3);
        assert_eq!(attraction.content_id, "2871024");
        assert_eq!(attraction.telephone, "");
    }

    #[test]
    fn enums_use_backend_spelling() {
        assert_eq!(serde_json::to_value(Visibility::Public).unwrap(), json!("public"));
        assert_eq!(serde_json::to_value(ParticipantRole::Owner).unwrap(), json!("owner"));
        assert_eq!(serde_json::to_value(Sex::Female).unwrap(), json!("W"));
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let credentials = Credentials {
            access_token: "secret-access".into(),
            refresh_token: "secret-refresh".into(),
        };
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn plan_themes_are_indexed_by_id() {
        assert_eq!(PlanTheme::by_id(4).map(|t| t.label), Some("Unplanned"));
        assert!(PlanTheme::by_id(6).is_none());
    }
}
