//! Plan, point, participant and invitation client methods

use super::{ClientError, TrabuddyClient};
use crate::types::{
    AcceptInviteReqDto, CreateInviteCodeResDto, CreatePlanReqDto, CreatePlanResDto,
    CreatePointReqDto, CreatePointResDto, GetParticipantResDto, GetPlanResDto, GetPointsResDto,
    InviteInfoResDto, PlanNicknameReqDto, PlanNicknameResDto, UpdateParticipantReqDto,
    UpdateParticipantResDto, UpdatePlanReqDto, UpdatePlanResDto, UpdatePointReqDto,
    UpdatePointResDto,
};
use reqwest::Method;

fn plan_path(plan_id: i64) -> String {
    format!("/api/v1/plans/{plan_id}")
}

impl TrabuddyClient {
    pub async fn get_plan(&self, plan_id: i64) -> Result<GetPlanResDto, ClientError> {
        self.execute(self.request(Method::GET, &plan_path(plan_id)))
            .await
    }

    pub async fn create_plan(
        &self,
        data: &CreatePlanReqDto,
    ) -> Result<CreatePlanResDto, ClientError> {
        let request = self.request(Method::POST, "/api/v1/plans").json(data)?;
        self.execute(request).await
    }

    pub async fn update_plan(
        &self,
        plan_id: i64,
        data: &UpdatePlanReqDto,
    ) -> Result<UpdatePlanResDto, ClientError> {
        let request = self.request(Method::PATCH, &plan_path(plan_id)).json(data)?;
        // Some deployments acknowledge with an empty body
        Ok(self
            .execute::<Option<UpdatePlanResDto>>(request)
            .await?
            .unwrap_or_default())
    }

    pub async fn delete_plan(&self, plan_id: i64) -> Result<(), ClientError> {
        self.execute_unit(self.request(Method::DELETE, &plan_path(plan_id)))
            .await
    }

    pub async fn get_points(&self, plan_id: i64) -> Result<Vec<GetPointsResDto>, ClientError> {
        let path = format!("{}/points", plan_path(plan_id));
        self.execute(self.request(Method::GET, &path)).await
    }

    pub async fn add_point(
        &self,
        plan_id: i64,
        data: &CreatePointReqDto,
    ) -> Result<CreatePointResDto, ClientError> {
        let path = format!("{}/points", plan_path(plan_id));
        let request = self.request(Method::POST, &path).json(data)?;
        self.execute(request).await
    }

    pub async fn update_point(
        &self,
        plan_id: i64,
        point_id: i64,
        data: &UpdatePointReqDto,
    ) -> Result<UpdatePointResDto, ClientError> {
        let path = format!("{}/points/{point_id}", plan_path(plan_id));
        let request = self.request(Method::PATCH, &path).json(data)?;
        Ok(self
            .execute::<Option<UpdatePointResDto>>(request)
            .await?
            .unwrap_or_default())
    }

    pub async fn delete_point(&self, plan_id: i64, point_id: i64) -> Result<(), ClientError> {
        let path = format!("{}/points/{point_id}", plan_path(plan_id));
        self.execute_unit(self.request(Method::DELETE, &path)).await
    }

    pub async fn get_participants(
        &self,
        plan_id: i64,
    ) -> Result<Vec<GetParticipantResDto>, ClientError> {
        let path = format!("{}/participants", plan_path(plan_id));
        self.execute(self.request(Method::GET, &path)).await
    }

    pub async fn update_participant(
        &self,
        plan_id: i64,
        user_id: i64,
        data: &UpdateParticipantReqDto,
    ) -> Result<UpdateParticipantResDto, ClientError> {
        let path = format!("{}/participants/{user_id}", plan_path(plan_id));
        let request = self.request(Method::PATCH, &path).json(data)?;
        self.execute(request).await
    }

    pub async fn delete_participant(&self, plan_id: i64, user_id: i64) -> Result<(), ClientError> {
        let path = format!("{}/participants/{user_id}", plan_path(plan_id));
        self.execute_unit(self.request(Method::DELETE, &path)).await
    }

    /// Set the nickname a participant uses within one plan
    pub async fn update_nickname(
        &self,
        plan_id: i64,
        user_id: i64,
        data: &PlanNicknameReqDto,
    ) -> Result<PlanNicknameResDto, ClientError> {
        let path = format!("{}/nickname/{user_id}", plan_path(plan_id));
        let request = self.request(Method::PUT, &path).json(data)?;
        self.execute(request).await
    }

    pub async fn create_invite_code(
        &self,
        plan_id: i64,
    ) -> Result<CreateInviteCodeResDto, ClientError> {
        let path = format!("{}/invite", plan_path(plan_id));
        self.execute(self.request(Method::POST, &path)).await
    }

    pub async fn get_invite_info(&self, invite_code: &str) -> Result<InviteInfoResDto, ClientError> {
        let request = self
            .request(Method::GET, "/api/v1/plans/join")
            .query("inviteCode", Some(invite_code));
        self.execute(request).await
    }

    pub async fn accept_invite(&self, invite_code: &str) -> Result<(), ClientError> {
        let request = self
            .request(Method::POST, "/api/v1/plans/join")
            .json(&AcceptInviteReqDto {
                invite_code: invite_code.to_string(),
            })?;
        self.execute_unit(request).await
    }
}
