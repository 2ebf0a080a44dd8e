//! 社交资料、分享设置和 NFC 标签

use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict, Query};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, ExprTrait, QueryFilter,
    QueryOrder,
};
use tracing::info;

use super::converters::{
    encode_string_list, model_to_nfc_tag, model_to_sharing_settings, model_to_social_profile,
    nfc_tag_to_active_model, social_profile_to_active_model,
};
use super::{SeaOrmStorage, retry};
use crate::errors::{CardshareError, Result};
use crate::storage::models::{NfcTag, SharingSettings, SocialProfile};

use migration::entities::{nfc_tag, sharing_setting, social_profile};

impl SeaOrmStorage {
    // ---------------- social profiles ----------------

    pub async fn insert_social_profile(&self, profile: &SocialProfile) -> Result<()> {
        let db = &self.db;
        let active_model = social_profile_to_active_model(profile, true);

        retry::with_retry("insert_social_profile", self.retry_config, || async {
            social_profile::Entity::insert(active_model.clone())
                .exec_without_returning(db)
                .await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("创建社交资料失败: {}", e)))?;
        Ok(())
    }

    pub async fn get_social_profile(&self, id: &str) -> Result<Option<SocialProfile>> {
        let db = &self.db;
        let id_owned = id.to_string();

        let model = retry::with_retry("get_social_profile", self.retry_config, || async {
            social_profile::Entity::find_by_id(&id_owned).one(db).await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("查询社交资料失败: {}", e)))?;

        Ok(model.map(model_to_social_profile))
    }

    pub async fn list_social_profiles(&self, user_id: &str) -> Result<Vec<SocialProfile>> {
        let db = &self.db;
        let user_owned = user_id.to_string();

        let models = retry::with_retry("list_social_profiles", self.retry_config, || async {
            social_profile::Entity::find()
                .filter(social_profile::Column::UserId.eq(&user_owned))
                .order_by_asc(social_profile::Column::CreatedAt)
                .all(db)
                .await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("查询社交资料失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_social_profile).collect())
    }

    pub async fn update_social_profile(&self, profile: &SocialProfile) -> Result<()> {
        let db = &self.db;
        let active_model = social_profile_to_active_model(profile, false);
        let id_owned = profile.id.clone();

        let result = retry::with_retry("update_social_profile", self.retry_config, || async {
            social_profile::Entity::update_many()
                .set(active_model.clone())
                .filter(social_profile::Column::Id.eq(&id_owned))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("更新社交资料失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(CardshareError::not_found(format!(
                "Social profile not found: {}",
                profile.id
            )));
        }
        Ok(())
    }

    pub async fn delete_social_profile(&self, id: &str) -> Result<()> {
        let db = &self.db;
        let id_owned = id.to_string();

        let result = retry::with_retry("delete_social_profile", self.retry_config, || async {
            social_profile::Entity::delete_by_id(&id_owned).exec(db).await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("删除社交资料失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(CardshareError::not_found(format!(
                "Social profile not found: {}",
                id
            )));
        }
        Ok(())
    }

    // ---------------- sharing settings ----------------

    pub async fn get_sharing_settings(&self, user_id: &str) -> Result<Option<SharingSettings>> {
        let db = &self.db;
        let user_owned = user_id.to_string();

        let model = retry::with_retry("get_sharing_settings", self.retry_config, || async {
            sharing_setting::Entity::find_by_id(&user_owned).one(db).await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("查询分享设置失败: {}", e)))?;

        Ok(model.map(model_to_sharing_settings))
    }

    /// 每个用户一行，存在则覆盖
    pub async fn upsert_sharing_settings(&self, settings: &SharingSettings) -> Result<()> {
        let db = &self.db;
        let now = Utc::now();
        let active_model = sharing_setting::ActiveModel {
            user_id: Set(settings.user_id.clone()),
            auto_share: Set(settings.auto_share),
            platforms: Set(encode_string_list(&settings.platforms)),
            include_qr: Set(settings.include_qr),
            custom_message: Set(settings.custom_message.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        retry::with_retry("upsert_sharing_settings", self.retry_config, || async {
            sharing_setting::Entity::insert(active_model.clone())
                .on_conflict(
                    OnConflict::column(sharing_setting::Column::UserId)
                        .update_columns([
                            sharing_setting::Column::AutoShare,
                            sharing_setting::Column::Platforms,
                            sharing_setting::Column::IncludeQr,
                            sharing_setting::Column::CustomMessage,
                            sharing_setting::Column::UpdatedAt,
                        ])
                        .to_owned(),
                )
                .exec(db)
                .await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("保存分享设置失败: {}", e)))?;

        Ok(())
    }

    // ---------------- NFC tags ----------------

    pub async fn insert_nfc_tag(&self, tag: &NfcTag) -> Result<()> {
        let db = &self.db;
        let active_model = nfc_tag_to_active_model(tag);

        retry::with_retry("insert_nfc_tag", self.retry_config, || async {
            nfc_tag::Entity::insert(active_model.clone())
                .exec_without_returning(db)
                .await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("创建 NFC 标签失败: {}", e)))?;

        info!("NFC tag created: {} -> card {}", tag.id, tag.card_id);
        Ok(())
    }

    pub async fn get_nfc_tag(&self, id: &str) -> Result<Option<NfcTag>> {
        let db = &self.db;
        let id_owned = id.to_string();

        let model = retry::with_retry("get_nfc_tag", self.retry_config, || async {
            nfc_tag::Entity::find_by_id(&id_owned).one(db).await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("查询 NFC 标签失败: {}", e)))?;

        Ok(model.map(model_to_nfc_tag))
    }

    /// 用户的 NFC 标签，最新在前
    pub async fn list_nfc_tags(&self, user_id: &str) -> Result<Vec<NfcTag>> {
        let db = &self.db;
        let user_owned = user_id.to_string();

        let models = retry::with_retry("list_nfc_tags", self.retry_config, || async {
            nfc_tag::Entity::find()
                .filter(nfc_tag::Column::UserId.eq(&user_owned))
                .order_by_desc(nfc_tag::Column::CreatedAt)
                .all(db)
                .await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("查询 NFC 标签失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_nfc_tag).collect())
    }

    pub async fn set_nfc_tag_active(&self, id: &str, active: bool) -> Result<()> {
        let db = &self.db;
        let id_owned = id.to_string();
        let patch = nfc_tag::ActiveModel {
            is_active: Set(active),
            ..Default::default()
        };

        let result = retry::with_retry("set_nfc_tag_active", self.retry_config, || async {
            nfc_tag::Entity::update_many()
                .set(patch.clone())
                .filter(nfc_tag::Column::Id.eq(&id_owned))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("更新 NFC 标签失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(CardshareError::not_found(format!("NFC tag not found: {}", id)));
        }
        Ok(())
    }

    pub async fn delete_nfc_tag(&self, id: &str) -> Result<()> {
        let db = &self.db;
        let id_owned = id.to_string();

        let result = retry::with_retry("delete_nfc_tag", self.retry_config, || async {
            nfc_tag::Entity::delete_by_id(&id_owned).exec(db).await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("删除 NFC 标签失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(CardshareError::not_found(format!("NFC tag not found: {}", id)));
        }
        Ok(())
    }

    /// 写入计数原子自增并刷新 last_used
    pub async fn record_nfc_write(&self, id: &str) -> Result<()> {
        let db = &self.db;
        let stmt = Query::update()
            .table(nfc_tag::Entity)
            .value(
                nfc_tag::Column::WriteCount,
                Expr::col(nfc_tag::Column::WriteCount).add(1),
            )
            .value(nfc_tag::Column::LastUsed, Expr::val(Utc::now()))
            .and_where(Expr::col(nfc_tag::Column::Id).eq(id))
            .to_owned();
        let stmt_ref = &stmt;

        let result = retry::with_retry("record_nfc_write", self.retry_config, || async {
            db.execute(stmt_ref).await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("更新 NFC 写入次数失败: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(CardshareError::not_found(format!("NFC tag not found: {}", id)));
        }
        Ok(())
    }
}
