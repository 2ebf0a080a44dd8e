use sea_orm::{EntityTrait, sea_query::OnConflict};
use tracing::debug;

use super::converters::{model_to_user, user_to_active_model};
use super::{SeaOrmStorage, retry};
use crate::errors::{CardshareError, Result};
use crate::storage::models::User;

use migration::entities::user;

impl SeaOrmStorage {
    pub async fn get_user(&self, id: &str) -> Result<Option<User>> {
        let db = &self.db;
        let id_owned = id.to_string();

        let model = retry::with_retry(&format!("get_user({})", id), self.retry_config, || async {
            user::Entity::find_by_id(&id_owned).one(db).await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("查询用户失败: {}", e)))?;

        Ok(model.map(model_to_user))
    }

    /// 按 id upsert，冲突时保留 created_at
    pub async fn upsert_user(&self, u: &User) -> Result<()> {
        let db = &self.db;
        let active_model = user_to_active_model(u, true);

        retry::with_retry(&format!("upsert_user({})", u.id), self.retry_config, || async {
            user::Entity::insert(active_model.clone())
                .on_conflict(
                    OnConflict::column(user::Column::Id)
                        .update_columns([
                            user::Column::Email,
                            user::Column::DisplayName,
                            user::Column::AvatarUrl,
                            user::Column::Company,
                            user::Column::JobTitle,
                            user::Column::Phone,
                            user::Column::Website,
                            user::Column::Bio,
                            user::Column::UpdatedAt,
                        ])
                        .to_owned(),
                )
                .exec(db)
                .await
        })
        .await
        .map_err(|e| {
            CardshareError::database_operation(format!("保存用户 '{}' 失败: {}", u.id, e))
        })?;

        debug!("User upserted: {}", u.id);
        Ok(())
    }
}
