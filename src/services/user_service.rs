//! User profile service

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use crate::api::constants::TS_EXPORT_PATH;
use crate::errors::{CardshareError, Result};
use crate::storage::{SeaOrmStorage, User};
use crate::utils::non_empty;
use crate::utils::url_validator::validate_optional_url;

/// 已认证用户（来自 JWT）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// 资料修改请求，缺省字段保持不变，空字符串表示清空
#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
}

impl UpdateProfileRequest {
    fn validate(&self) -> Result<()> {
        validate_optional_url("avatar_url", self.avatar_url.as_deref())?;
        validate_optional_url("website", self.website.as_deref())?;
        Ok(())
    }

    fn apply(self, user: &mut User) {
        let set = |slot: &mut Option<String>, value: Option<String>| {
            if value.is_some() {
                *slot = non_empty(value);
            }
        };
        set(&mut user.display_name, self.display_name);
        set(&mut user.avatar_url, self.avatar_url);
        set(&mut user.company, self.company);
        set(&mut user.job_title, self.job_title);
        set(&mut user.phone, self.phone);
        set(&mut user.website, self.website);
        set(&mut user.bio, self.bio);
    }
}

pub struct UserService {
    storage: Arc<SeaOrmStorage>,
}

impl UserService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 首次登录时创建用户，之后更新资料与 email
    pub async fn create_or_update_user(
        &self,
        auth: &AuthUser,
        profile: UpdateProfileRequest,
    ) -> Result<User> {
        profile.validate()?;
        let now = Utc::now();

        let mut user = match self.storage.get_user(&auth.id).await? {
            Some(existing) => existing,
            None => {
                info!("Creating user {}", auth.id);
                User {
                    id: auth.id.clone(),
                    email: auth.email.clone(),
                    display_name: None,
                    avatar_url: None,
                    company: None,
                    job_title: None,
                    phone: None,
                    website: None,
                    bio: None,
                    created_at: now,
                    updated_at: now,
                }
            }
        };

        if !auth.email.is_empty() {
            user.email = auth.email.clone();
        }
        profile.apply(&mut user);
        user.updated_at = now;

        self.storage.upsert_user(&user).await?;
        Ok(user)
    }

    pub async fn get_current_user(&self, auth: &AuthUser) -> Result<User> {
        self.storage
            .get_user(&auth.id)
            .await?
            .ok_or_else(|| CardshareError::not_found(format!("User not found: {}", auth.id)))
    }

    /// 仅修改已存在用户的资料
    pub async fn update_profile(&self, user_id: &str, profile: UpdateProfileRequest) -> Result<User> {
        profile.validate()?;
        let mut user = self
            .storage
            .get_user(user_id)
            .await?
            .ok_or_else(|| CardshareError::not_found(format!("User not found: {}", user_id)))?;

        profile.apply(&mut user);
        user.updated_at = Utc::now();
        self.storage.upsert_user(&user).await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_user() -> User {
        let now = Utc::now();
        User {
            id: "user_1".into(),
            email: "a@b.c".into(),
            display_name: Some("Ada".into()),
            avatar_url: None,
            company: Some("Engines".into()),
            job_title: None,
            phone: None,
            website: None,
            bio: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_apply_keeps_absent_and_clears_empty() {
        let mut user = blank_user();
        UpdateProfileRequest {
            company: Some("".into()),
            job_title: Some("Analyst".into()),
            ..Default::default()
        }
        .apply(&mut user);

        assert_eq!(user.display_name.as_deref(), Some("Ada"));
        assert_eq!(user.company, None);
        assert_eq!(user.job_title.as_deref(), Some("Analyst"));
    }

    #[test]
    fn test_validate_rejects_bad_website() {
        let req = UpdateProfileRequest {
            website: Some("ftp://example.com".into()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
