//! Wire types exchanged with the Trabuddy backend
//!
//! Timestamps travel as strings in `YYYY-MM-DD HH:MM:SS` form; conversion to
//! dates happens in the frontend services.

use serde::{Deserialize, Serialize};
use trabuddy_core::{AttractionItem, ParticipantRole, Sex, Visibility};

/// `GET /api/v1/users/profile`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoDto {
    pub user_id: i64,
    pub nickname: String,
}

/// `GET /api/v1/users/my-page`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfileDto {
    pub nickname: String,
    pub age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
}

/// `PUT /api/v1/users/my-page`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditUserProfileDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
}

/// Plan as returned by the plan and "my plans" endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPlanResDto {
    pub plan_id: i64,
    #[serde(default)]
    pub theme_id: i64,
    pub owner_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub people: u32,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

pub type MyPlanDto = GetPlanResDto;
pub type MyJoinDto = GetPlanResDto;
pub type MyLikeDto = GetPlanResDto;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanReqDto {
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub theme_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanResDto {
    pub plan_id: i64,
    pub title: String,
    pub created_at: String,
}

/// Partial plan update; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanReqDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub people: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePlanResDto {
    pub plan_id: Option<i64>,
    pub theme_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub memo: Option<String>,
    pub people: Option<u32>,
    pub visibility: Option<Visibility>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetParticipantResDto {
    pub user_id: i64,
    pub nickname: String,
    pub role: ParticipantRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateParticipantReqDto {
    pub role: ParticipantRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParticipantResDto {
    pub user_id: i64,
    pub role: ParticipantRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPointsResDto {
    pub point_id: i64,
    pub from: String,
    pub to: String,
    pub attraction: AttractionItem,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePointReqDto {
    pub attraction_id: i64,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePointResDto {
    pub point_id: i64,
    pub attraction_id: i64,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePointReqDto {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePointResDto {
    pub point_id: Option<i64>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanNicknameReqDto {
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanNicknameResDto {
    pub user_id: i64,
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInviteCodeResDto {
    pub invite_code: String,
    pub valid_until: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteInfoResDto {
    pub nickname: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInviteReqDto {
    pub invite_code: String,
}

/// Attraction search filters; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttractionQuery {
    pub sido_code: Option<String>,
    pub sigungu_code: Option<String>,
    pub content_type_id: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub keyword: Option<String>,
}
