//! 卡片计数器与访问/分享事件
//!
//! 计数器只通过单条 `UPDATE ... SET col = col + 1` 修改，并发安全。

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, ExprTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::debug;

use super::converters::{model_to_card_share, model_to_card_view};
use super::{SeaOrmStorage, retry};
use crate::errors::{CardshareError, Result};
use crate::services::analytics::ViewContext;
use crate::storage::models::{CardShare, CardView};

use migration::entities::{card_share, card_view, digital_card};

/// 卡片上的三个计数器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardCounter {
    View,
    Share,
    Contact,
}

impl CardCounter {
    fn column(self) -> digital_card::Column {
        match self {
            CardCounter::View => digital_card::Column::ViewCount,
            CardCounter::Share => digital_card::Column::ShareCount,
            CardCounter::Contact => digital_card::Column::ContactCount,
        }
    }
}

/// 在给定连接（或事务）上原子自增，返回受影响行数
pub(super) async fn increment_on<C: ConnectionTrait>(
    conn: &C,
    card_id: &str,
    counter: CardCounter,
) -> std::result::Result<u64, DbErr> {
    let col = counter.column();
    let stmt = Query::update()
        .table(digital_card::Entity)
        .value(col, Expr::col(col).add(1))
        .value(digital_card::Column::UpdatedAt, Expr::val(Utc::now()))
        .and_where(Expr::col(digital_card::Column::Id).eq(card_id))
        .to_owned();

    let result = conn.execute(&stmt).await?;
    Ok(result.rows_affected())
}

pub(super) fn view_active_model(card_id: &str, ctx: &ViewContext) -> card_view::ActiveModel {
    card_view::ActiveModel {
        card_id: Set(card_id.to_string()),
        viewer_ip: Set(ctx.ip.clone()),
        viewer_user_agent: Set(ctx.user_agent.clone()),
        viewer_location: Set(ctx.location.clone()),
        referrer: Set(ctx.referrer.clone()),
        viewed_at: Set(Utc::now()),
        ..Default::default()
    }
}

pub(super) fn share_active_model(card_id: &str, method: &str) -> card_share::ActiveModel {
    card_share::ActiveModel {
        card_id: Set(card_id.to_string()),
        share_method: Set(method.to_string()),
        shared_at: Set(Utc::now()),
        ..Default::default()
    }
}

fn window_condition<C: ColumnTrait>(
    card_col: C,
    time_col: C,
    card_ids: &[String],
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
) -> Condition {
    let mut condition = Condition::all().add(card_col.is_in(card_ids.iter().cloned()));
    if let Some(since) = since {
        condition = condition.add(time_col.gte(since));
    }
    if let Some(until) = until {
        condition = condition.add(time_col.lt(until));
    }
    condition
}

impl SeaOrmStorage {
    async fn increment_counter(&self, card_id: &str, counter: CardCounter) -> Result<()> {
        let db = &self.db;

        let affected = retry::with_retry(
            &format!("increment_{:?}({})", counter, card_id),
            self.retry_config,
            || async { increment_on(db, card_id, counter).await },
        )
        .await
        .map_err(|e| CardshareError::database_operation(format!("更新计数失败: {}", e)))?;

        if affected == 0 {
            return Err(CardshareError::not_found(format!(
                "Card not found: {}",
                card_id
            )));
        }

        debug!("{:?} counter incremented for card {}", counter, card_id);
        Ok(())
    }

    pub async fn increment_view_count(&self, card_id: &str) -> Result<()> {
        self.increment_counter(card_id, CardCounter::View).await
    }

    pub async fn increment_share_count(&self, card_id: &str) -> Result<()> {
        self.increment_counter(card_id, CardCounter::Share).await
    }

    pub async fn increment_contact_count(&self, card_id: &str) -> Result<()> {
        self.increment_counter(card_id, CardCounter::Contact).await
    }

    /// 追加访问记录（不修改计数器）
    pub async fn insert_card_view(&self, card_id: &str, ctx: &ViewContext) -> Result<()> {
        let db = &self.db;
        let active_model = view_active_model(card_id, ctx);

        retry::with_retry("insert_card_view", self.retry_config, || async {
            card_view::Entity::insert(active_model.clone())
                .exec_without_returning(db)
                .await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("写入访问记录失败: {}", e)))?;
        Ok(())
    }

    /// 追加分享记录（不修改计数器）
    pub async fn insert_card_share(&self, card_id: &str, method: &str) -> Result<()> {
        let db = &self.db;
        let active_model = share_active_model(card_id, method);

        retry::with_retry("insert_card_share", self.retry_config, || async {
            card_share::Entity::insert(active_model.clone())
                .exec_without_returning(db)
                .await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("写入分享记录失败: {}", e)))?;
        Ok(())
    }

    /// 卡片访问记录，最新在前
    pub async fn list_views_for_card(
        &self,
        card_id: &str,
        since: Option<DateTime<Utc>>,
        limit: Option<u64>,
    ) -> Result<Vec<CardView>> {
        let db = &self.db;
        let ids = [card_id.to_string()];
        let condition = window_condition(
            card_view::Column::CardId,
            card_view::Column::ViewedAt,
            &ids,
            since,
            None,
        );

        let models = retry::with_retry("list_views_for_card", self.retry_config, || async {
            card_view::Entity::find()
                .filter(condition.clone())
                .order_by_desc(card_view::Column::ViewedAt)
                .order_by_desc(card_view::Column::Id)
                .limit(limit)
                .all(db)
                .await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("查询访问记录失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_card_view).collect())
    }

    /// 卡片分享记录，最新在前
    pub async fn list_shares_for_card(
        &self,
        card_id: &str,
        since: Option<DateTime<Utc>>,
        limit: Option<u64>,
    ) -> Result<Vec<CardShare>> {
        let db = &self.db;
        let ids = [card_id.to_string()];
        let condition = window_condition(
            card_share::Column::CardId,
            card_share::Column::SharedAt,
            &ids,
            since,
            None,
        );

        let models = retry::with_retry("list_shares_for_card", self.retry_config, || async {
            card_share::Entity::find()
                .filter(condition.clone())
                .order_by_desc(card_share::Column::SharedAt)
                .order_by_desc(card_share::Column::Id)
                .limit(limit)
                .all(db)
                .await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("查询分享记录失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_card_share).collect())
    }

    /// 一组卡片在 `[since, until)` 内的访问次数
    pub async fn count_views_for_cards(
        &self,
        card_ids: &[String],
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<u64> {
        if card_ids.is_empty() {
            return Ok(0);
        }
        let db = &self.db;
        let condition = window_condition(
            card_view::Column::CardId,
            card_view::Column::ViewedAt,
            card_ids,
            since,
            until,
        );

        retry::with_retry("count_views_for_cards", self.retry_config, || async {
            card_view::Entity::find()
                .filter(condition.clone())
                .count(db)
                .await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("统计访问失败: {}", e)))
    }

    /// 一组卡片在 `[since, until)` 内的分享次数
    pub async fn count_shares_for_cards(
        &self,
        card_ids: &[String],
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<u64> {
        if card_ids.is_empty() {
            return Ok(0);
        }
        let db = &self.db;
        let condition = window_condition(
            card_share::Column::CardId,
            card_share::Column::SharedAt,
            card_ids,
            since,
            until,
        );

        retry::with_retry("count_shares_for_cards", self.retry_config, || async {
            card_share::Entity::find()
                .filter(condition.clone())
                .count(db)
                .await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("统计分享失败: {}", e)))
    }
}
