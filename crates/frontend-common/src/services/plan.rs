//! Plan, point, participant and invitation service

use chrono::NaiveDateTime;
use trabuddy_core::date::{deserialize_date, deserialize_optional_date, serialize_date};
use trabuddy_core::{
    CoreResult, InviteCodeItem, InviteInfoItem, ParticipantItem, ParticipantRole, PlanItem,
    PointItem, Visibility,
};
use trabuddy_http::types::{
    CreatePlanReqDto, CreatePlanResDto, CreatePointReqDto, CreatePointResDto,
    GetParticipantResDto, GetPlanResDto, GetPointsResDto, PlanNicknameReqDto, PlanNicknameResDto,
    UpdateParticipantReqDto, UpdatePlanReqDto, UpdatePlanResDto, UpdatePointReqDto,
    UpdatePointResDto,
};
use trabuddy_http::{ClientError, TrabuddyClient};

/// Theme sent when a plan is created; the user picks one later
const DEFAULT_THEME_ID: i64 = 0;

/// Fields of a plan to change; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanUpdate {
    pub theme_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub memo: Option<String>,
    pub people: Option<u32>,
    pub visibility: Option<Visibility>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

impl From<&PlanUpdate> for UpdatePlanReqDto {
    fn from(update: &PlanUpdate) -> Self {
        Self {
            theme_id: update.theme_id,
            title: update.title.clone(),
            description: update.description.clone(),
            memo: update.memo.clone(),
            people: update.people,
            visibility: update.visibility,
            start_date: update.start_date.as_ref().map(serialize_date),
            end_date: update.end_date.as_ref().map(serialize_date),
        }
    }
}

/// Convert a plan DTO, parsing its timestamps
pub fn plan_item(dto: GetPlanResDto) -> CoreResult<PlanItem> {
    Ok(PlanItem {
        created_at: deserialize_optional_date(dto.created_at.as_deref())?,
        start_date: deserialize_optional_date(dto.start_date.as_deref())?,
        end_date: deserialize_optional_date(dto.end_date.as_deref())?,
        plan_id: dto.plan_id,
        theme_id: dto.theme_id,
        owner_id: dto.owner_id,
        title: dto.title,
        description: dto.description,
        memo: dto.memo,
        people: dto.people,
        visibility: dto.visibility,
    })
}

pub fn plan_items(dtos: Vec<GetPlanResDto>) -> CoreResult<Vec<PlanItem>> {
    dtos.into_iter().map(plan_item).collect()
}

fn point_item(dto: GetPointsResDto) -> CoreResult<PointItem> {
    Ok(PointItem {
        point_id: dto.point_id,
        start_date: deserialize_date(&dto.from)?,
        end_date: deserialize_date(&dto.to)?,
        attraction: dto.attraction,
    })
}

fn participant_item(dto: GetParticipantResDto) -> ParticipantItem {
    ParticipantItem {
        user_id: dto.user_id,
        nickname: dto.nickname,
        role: dto.role,
    }
}

/// Plan operations for the plan and my-page views
#[derive(Clone)]
pub struct PlanService {
    client: TrabuddyClient,
}

impl PlanService {
    pub fn new(client: TrabuddyClient) -> Self {
        Self { client }
    }

    pub async fn get_plan(&self, plan_id: i64) -> Result<PlanItem, ClientError> {
        let dto = self.client.get_plan(plan_id).await?;
        Ok(plan_item(dto)?)
    }

    /// Create a plan with the default theme
    pub async fn create_plan(
        &self,
        title: &str,
        start_date: &NaiveDateTime,
        end_date: &NaiveDateTime,
    ) -> Result<CreatePlanResDto, ClientError> {
        let request = CreatePlanReqDto {
            title: title.to_string(),
            start_date: serialize_date(start_date),
            end_date: serialize_date(end_date),
            theme_id: DEFAULT_THEME_ID,
        };
        self.client.create_plan(&request).await
    }

    pub async fn update_plan(
        &self,
        plan_id: i64,
        update: &PlanUpdate,
    ) -> Result<UpdatePlanResDto, ClientError> {
        self.client.update_plan(plan_id, &update.into()).await
    }

    pub async fn delete_plan(&self, plan_id: i64) -> Result<(), ClientError> {
        self.client.delete_plan(plan_id).await
    }

    pub async fn get_points(&self, plan_id: i64) -> Result<Vec<PointItem>, ClientError> {
        let dtos = self.client.get_points(plan_id).await?;
        Ok(dtos
            .into_iter()
            .map(point_item)
            .collect::<CoreResult<Vec<_>>>()?)
    }

    pub async fn add_point(
        &self,
        plan_id: i64,
        attraction_id: i64,
        from: &NaiveDateTime,
        to: &NaiveDateTime,
    ) -> Result<CreatePointResDto, ClientError> {
        let request = CreatePointReqDto {
            attraction_id,
            from: serialize_date(from),
            to: serialize_date(to),
        };
        self.client.add_point(plan_id, &request).await
    }

    pub async fn update_point(
        &self,
        plan_id: i64,
        point_id: i64,
        from: &NaiveDateTime,
        to: &NaiveDateTime,
    ) -> Result<UpdatePointResDto, ClientError> {
        let request = UpdatePointReqDto {
            from: serialize_date(from),
            to: serialize_date(to),
        };
        self.client.update_point(plan_id, point_id, &request).await
    }

    pub async fn delete_point(&self, plan_id: i64, point_id: i64) -> Result<(), ClientError> {
        self.client.delete_point(plan_id, point_id).await
    }

    pub async fn get_participants(&self, plan_id: i64) -> Result<Vec<ParticipantItem>, ClientError> {
        let dtos = self.client.get_participants(plan_id).await?;
        Ok(dtos.into_iter().map(participant_item).collect())
    }

    pub async fn update_participant(
        &self,
        plan_id: i64,
        user_id: i64,
        role: ParticipantRole,
    ) -> Result<ParticipantRole, ClientError> {
        let response = self
            .client
            .update_participant(plan_id, user_id, &UpdateParticipantReqDto { role })
            .await?;
        Ok(response.role)
    }

    pub async fn delete_participant(&self, plan_id: i64, user_id: i64) -> Result<(), ClientError> {
        self.client.delete_participant(plan_id, user_id).await
    }

    pub async fn update_nickname(
        &self,
        plan_id: i64,
        user_id: i64,
        nickname: &str,
    ) -> Result<PlanNicknameResDto, ClientError> {
        let request = PlanNicknameReqDto {
            nickname: nickname.to_string(),
        };
        self.client.update_nickname(plan_id, user_id, &request).await
    }

    pub async fn create_invite_code(&self, plan_id: i64) -> Result<InviteCodeItem, ClientError> {
        let dto = self.client.create_invite_code(plan_id).await?;
        Ok(InviteCodeItem {
            valid_until: deserialize_date(&dto.valid_until)?,
            invite_code: dto.invite_code,
        })
    }

    pub async fn get_invite_info(&self, invite_code: &str) -> Result<InviteInfoItem, ClientError> {
        let dto = self.client.get_invite_info(invite_code).await?;
        Ok(InviteInfoItem {
            nickname: dto.nickname,
            title: dto.title,
        })
    }

    pub async fn accept_invite(&self, invite_code: &str) -> Result<(), ClientError> {
        self.client.accept_invite(invite_code).await
    }
}
