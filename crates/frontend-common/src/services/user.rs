//! User identity and profile service

use super::plan::plan_items;
use tracing::debug;
use trabuddy_core::{PlanItem, UserIdentity, UserProfile};
use trabuddy_http::types::{EditUserProfileDto, UserProfileDto};
use trabuddy_http::{ClientError, TrabuddyClient};

fn user_profile(dto: UserProfileDto) -> UserProfile {
    UserProfile {
        nickname: dto.nickname,
        age: dto.age,
        sex: dto.sex,
    }
}

/// User operations and identity hydration
#[derive(Clone)]
pub struct UserService {
    client: TrabuddyClient,
}

impl UserService {
    pub fn new(client: TrabuddyClient) -> Self {
        Self { client }
    }

    /// Same service over a client that leaves navigation to the caller
    pub fn without_login_redirect(&self) -> Self {
        Self::new(self.client.without_login_redirect())
    }

    /// Fetch the identity of whoever the stored tokens belong to
    pub async fn get_user_info(&self) -> Result<UserIdentity, ClientError> {
        let dto = self.client.get_user_info().await?;
        Ok(UserIdentity {
            user_id: dto.user_id,
            nickname: dto.nickname,
        })
    }

    /// Populate the session identity when tokens exist but nobody is known yet
    ///
    /// Makes no request when there is no token or the identity is already
    /// loaded. A failed fetch leaves the identity empty.
    pub async fn retrieve_user_info_if_possible(
        &self,
    ) -> Result<Option<UserIdentity>, ClientError> {
        let context = self.client.context();
        if let Some(identity) = context.identity().get() {
            return Ok(Some(identity));
        }
        if !context.tokens().has_any_token() {
            return Ok(None);
        }

        let identity = self.get_user_info().await?;
        debug!(user_id = identity.user_id, "Loaded user identity");
        context.identity().set(Some(identity.clone()));
        Ok(Some(identity))
    }

    pub async fn get_user_profile(&self) -> Result<UserProfile, ClientError> {
        Ok(user_profile(self.client.get_user_profile().await?))
    }

    pub async fn edit_user_profile(
        &self,
        changes: &EditUserProfileDto,
    ) -> Result<UserProfile, ClientError> {
        let dto = self.client.edit_user_profile(changes).await?;
        if let Some(identity) = self.client.context().identity().get()
            && identity.nickname != dto.nickname
        {
            self.client.context().identity().set(Some(UserIdentity {
                nickname: dto.nickname.clone(),
                ..identity
            }));
        }
        Ok(user_profile(dto))
    }

    pub async fn get_my_plans(&self) -> Result<Vec<PlanItem>, ClientError> {
        Ok(plan_items(self.client.get_my_plans().await?)?)
    }

    pub async fn get_my_joins(&self) -> Result<Vec<PlanItem>, ClientError> {
        Ok(plan_items(self.client.get_my_joins().await?)?)
    }

    pub async fn get_my_likes(&self) -> Result<Vec<PlanItem>, ClientError> {
        Ok(plan_items(self.client.get_my_likes().await?)?)
    }

    /// Forget the session locally
    pub fn logout(&self) {
        self.client.logout();
    }
}
