//! digital_cards 表的读写

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::info;

use super::converters::{card_to_active_model, model_to_card};
use super::{SeaOrmStorage, retry};
use crate::errors::{CardshareError, Result};
use crate::storage::models::DigitalCard;

use migration::entities::digital_card;

impl SeaOrmStorage {
    pub async fn insert_card(&self, card: &DigitalCard) -> Result<()> {
        let db = &self.db;
        let active_model = card_to_active_model(card, true);

        retry::with_retry(&format!("insert_card({})", card.id), self.retry_config, || async {
            digital_card::Entity::insert(active_model.clone())
                .exec_without_returning(db)
                .await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("创建卡片失败: {}", e)))?;

        info!("Card created: {} (user: {})", card.id, card.user_id);
        Ok(())
    }

    pub async fn get_card(&self, id: &str) -> Result<Option<DigitalCard>> {
        let db = &self.db;
        let id_owned = id.to_string();

        let model = retry::with_retry(&format!("get_card({})", id), self.retry_config, || async {
            digital_card::Entity::find_by_id(&id_owned).one(db).await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("查询卡片失败: {}", e)))?;

        Ok(model.map(model_to_card))
    }

    /// 只有 is_public 且 is_active 的卡片对外可见
    pub async fn get_public_card(&self, id: &str) -> Result<Option<DigitalCard>> {
        let db = &self.db;
        let id_owned = id.to_string();

        let model = retry::with_retry(
            &format!("get_public_card({})", id),
            self.retry_config,
            || async {
                digital_card::Entity::find_by_id(&id_owned)
                    .filter(digital_card::Column::IsPublic.eq(true))
                    .filter(digital_card::Column::IsActive.eq(true))
                    .one(db)
                    .await
            },
        )
        .await
        .map_err(|e| CardshareError::database_operation(format!("查询公开卡片失败: {}", e)))?;

        Ok(model.map(model_to_card))
    }

    /// 用户的全部卡片，最新在前
    pub async fn list_cards_by_user(&self, user_id: &str) -> Result<Vec<DigitalCard>> {
        let db = &self.db;
        let user_owned = user_id.to_string();

        let models = retry::with_retry(
            &format!("list_cards_by_user({})", user_id),
            self.retry_config,
            || async {
                digital_card::Entity::find()
                    .filter(digital_card::Column::UserId.eq(&user_owned))
                    .order_by_desc(digital_card::Column::CreatedAt)
                    .order_by_desc(digital_card::Column::Id)
                    .all(db)
                    .await
            },
        )
        .await
        .map_err(|e| CardshareError::database_operation(format!("查询卡片列表失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_card).collect())
    }

    /// 更新卡片内容，计数器和 created_at 不受影响
    pub async fn update_card(&self, card: &DigitalCard) -> Result<()> {
        let db = &self.db;
        let active_model = card_to_active_model(card, false);
        let id_owned = card.id.clone();

        let result = retry::with_retry(&format!("update_card({})", card.id), self.retry_config, || async {
            digital_card::Entity::update_many()
                .set(active_model.clone())
                .filter(digital_card::Column::Id.eq(&id_owned))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("更新卡片失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(CardshareError::not_found(format!(
                "Card not found: {}",
                card.id
            )));
        }
        Ok(())
    }

    pub async fn delete_card(&self, id: &str) -> Result<()> {
        let db = &self.db;
        let id_owned = id.to_string();

        let result = retry::with_retry(&format!("delete_card({})", id), self.retry_config, || async {
            digital_card::Entity::delete_by_id(&id_owned).exec(db).await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("删除卡片失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(CardshareError::not_found(format!("Card not found: {}", id)));
        }

        info!("Card deleted: {}", id);
        Ok(())
    }
}
