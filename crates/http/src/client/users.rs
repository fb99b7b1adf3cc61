//! User API client methods

use super::{ClientError, TrabuddyClient};
use crate::types::{EditUserProfileDto, MyJoinDto, MyLikeDto, MyPlanDto, UserInfoDto, UserProfileDto};
use reqwest::Method;

pub const PROFILE_PATH: &str = "/api/v1/users/profile";

impl TrabuddyClient {
    /// Identity of the logged-in user
    pub async fn get_user_info(&self) -> Result<UserInfoDto, ClientError> {
        self.execute(self.request(Method::GET, PROFILE_PATH)).await
    }

    /// Editable profile shown on the my-page view
    pub async fn get_user_profile(&self) -> Result<UserProfileDto, ClientError> {
        self.execute(self.request(Method::GET, "/api/v1/users/my-page"))
            .await
    }

    pub async fn edit_user_profile(
        &self,
        data: &EditUserProfileDto,
    ) -> Result<UserProfileDto, ClientError> {
        let request = self
            .request(Method::PUT, "/api/v1/users/my-page")
            .json(data)?;
        self.execute(request).await
    }

    /// Plans owned by the user
    pub async fn get_my_plans(&self) -> Result<Vec<MyPlanDto>, ClientError> {
        self.execute(self.request(Method::GET, "/api/v1/users/my-plans"))
            .await
    }

    /// Plans the user joined through an invitation
    pub async fn get_my_joins(&self) -> Result<Vec<MyJoinDto>, ClientError> {
        self.execute(self.request(Method::GET, "/api/v1/users/my-joins"))
            .await
    }

    pub async fn get_my_likes(&self) -> Result<Vec<MyLikeDto>, ClientError> {
        self.execute(self.request(Method::GET, "/api/v1/users/likes"))
            .await
    }
}
