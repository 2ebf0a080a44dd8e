//! CardEventSink implementation for SeaOrmStorage
//!
//! 事件追加和计数器自增在同一事务内完成，卡片不存在时整体回滚。

use async_trait::async_trait;
use sea_orm::{EntityTrait, TransactionTrait};
use tracing::debug;

use super::SeaOrmStorage;
use super::events::{CardCounter, increment_on, share_active_model, view_active_model};
use crate::errors::{CardshareError, Result};
use crate::services::analytics::{CardEventSink, ViewContext};

use migration::entities::{card_share, card_view};

#[async_trait]
impl CardEventSink for SeaOrmStorage {
    async fn record_view(&self, card_id: &str, ctx: ViewContext) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CardshareError::database_operation(format!("开始事务失败: {}", e)))?;

        let affected = increment_on(&txn, card_id, CardCounter::View)
            .await
            .map_err(|e| CardshareError::database_operation(format!("更新访问计数失败: {}", e)))?;
        if affected == 0 {
            return Err(CardshareError::not_found(format!(
                "Card not found: {}",
                card_id
            )));
        }

        card_view::Entity::insert(view_active_model(card_id, &ctx))
            .exec_without_returning(&txn)
            .await
            .map_err(|e| CardshareError::database_operation(format!("写入访问记录失败: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| CardshareError::database_operation(format!("提交事务失败: {}", e)))?;

        debug!("View recorded for card {}", card_id);
        Ok(())
    }

    async fn record_share(&self, card_id: &str, method: &str) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CardshareError::database_operation(format!("开始事务失败: {}", e)))?;

        let affected = increment_on(&txn, card_id, CardCounter::Share)
            .await
            .map_err(|e| CardshareError::database_operation(format!("更新分享计数失败: {}", e)))?;
        if affected == 0 {
            return Err(CardshareError::not_found(format!(
                "Card not found: {}",
                card_id
            )));
        }

        card_share::Entity::insert(share_active_model(card_id, method))
            .exec_without_returning(&txn)
            .await
            .map_err(|e| CardshareError::database_operation(format!("写入分享记录失败: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| CardshareError::database_operation(format!("提交事务失败: {}", e)))?;

        debug!("Share via '{}' recorded for card {}", method, card_id);
        Ok(())
    }
}
