//! contacts 表的读写

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::info;

use super::converters::{contact_to_active_model, model_to_contact};
use super::events::{CardCounter, increment_on};
use super::{SeaOrmStorage, retry};
use crate::errors::{CardshareError, Result};
use crate::storage::models::Contact;

use migration::entities::contact;

/// 联系人过滤条件
#[derive(Default, Clone, Debug)]
pub struct ContactFilter {
    /// 不区分大小写匹配 full_name / email / company / job_title
    pub search: Option<String>,
    pub favorites_only: bool,
    /// created_at >= created_after
    pub created_after: Option<DateTime<Utc>>,
}

impl ContactFilter {
    pub fn matches_search(&self, c: &Contact) -> bool {
        let Some(needle) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        else {
            return true;
        };
        let needle = needle.to_lowercase();

        std::iter::once(Some(c.full_name.as_str()))
            .chain([
                c.email.as_deref(),
                c.company.as_deref(),
                c.job_title.as_deref(),
            ])
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

impl SeaOrmStorage {
    pub async fn insert_contact(&self, c: &Contact) -> Result<()> {
        let db = &self.db;
        let active_model = contact_to_active_model(c, true);

        retry::with_retry(&format!("insert_contact({})", c.id), self.retry_config, || async {
            contact::Entity::insert(active_model.clone())
                .exec_without_returning(db)
                .await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("创建联系人失败: {}", e)))?;

        Ok(())
    }

    /// 由卡片保存的联系人：插入与卡片 contact_count + 1 同一事务，卡片不存在时回滚
    pub async fn insert_contact_from_card(&self, c: &Contact, card_id: &str) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CardshareError::database_operation(format!("开始事务失败: {}", e)))?;

        let affected = increment_on(&txn, card_id, CardCounter::Contact)
            .await
            .map_err(|e| CardshareError::database_operation(format!("更新联系人计数失败: {}", e)))?;
        if affected == 0 {
            return Err(CardshareError::not_found(format!(
                "Card not found: {}",
                card_id
            )));
        }

        contact::Entity::insert(contact_to_active_model(c, true))
            .exec_without_returning(&txn)
            .await
            .map_err(|e| CardshareError::database_operation(format!("创建联系人失败: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| CardshareError::database_operation(format!("提交事务失败: {}", e)))?;
        Ok(())
    }

    /// 批量插入（单事务）
    pub async fn insert_contacts(&self, contacts: &[Contact]) -> Result<()> {
        if contacts.is_empty() {
            return Ok(());
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CardshareError::database_operation(format!("开始事务失败: {}", e)))?;

        let active_models: Vec<contact::ActiveModel> = contacts
            .iter()
            .map(|c| contact_to_active_model(c, true))
            .collect();

        contact::Entity::insert_many(active_models)
            .exec_without_returning(&txn)
            .await
            .map_err(|e| CardshareError::database_operation(format!("批量插入联系人失败: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| CardshareError::database_operation(format!("提交事务失败: {}", e)))?;

        info!("Batch inserted {} contacts", contacts.len());
        Ok(())
    }

    pub async fn get_contact(&self, id: &str) -> Result<Option<Contact>> {
        let db = &self.db;
        let id_owned = id.to_string();

        let model = retry::with_retry(&format!("get_contact({})", id), self.retry_config, || async {
            contact::Entity::find_by_id(&id_owned).one(db).await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("查询联系人失败: {}", e)))?;

        Ok(model.map(model_to_contact))
    }

    /// 用户联系人，最新在前
    pub async fn list_contacts_by_user(
        &self,
        user_id: &str,
        filter: &ContactFilter,
    ) -> Result<Vec<Contact>> {
        let db = &self.db;

        let mut condition = Condition::all().add(contact::Column::UserId.eq(user_id));
        if filter.favorites_only {
            condition = condition.add(contact::Column::IsFavorite.eq(true));
        }
        if let Some(after) = filter.created_after {
            condition = condition.add(contact::Column::CreatedAt.gte(after));
        }

        let models = retry::with_retry(
            &format!("list_contacts_by_user({})", user_id),
            self.retry_config,
            || async {
                contact::Entity::find()
                    .filter(condition.clone())
                    .order_by_desc(contact::Column::CreatedAt)
                    .order_by_desc(contact::Column::Id)
                    .all(db)
                    .await
            },
        )
        .await
        .map_err(|e| CardshareError::database_operation(format!("查询联系人列表失败: {}", e)))?;

        // 大小写不敏感的搜索在内存里做，避免各数据库 LIKE 语义差异
        Ok(models
            .into_iter()
            .map(model_to_contact)
            .filter(|c| filter.matches_search(c))
            .collect())
    }

    pub async fn update_contact(&self, c: &Contact) -> Result<()> {
        let db = &self.db;
        let active_model = contact_to_active_model(c, false);
        let id_owned = c.id.clone();

        let result = retry::with_retry(&format!("update_contact({})", c.id), self.retry_config, || async {
            contact::Entity::update_many()
                .set(active_model.clone())
                .filter(contact::Column::Id.eq(&id_owned))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("更新联系人失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(CardshareError::not_found(format!(
                "Contact not found: {}",
                c.id
            )));
        }
        Ok(())
    }

    pub async fn set_favorite(&self, id: &str, value: bool) -> Result<()> {
        let db = &self.db;
        let id_owned = id.to_string();
        let patch = contact::ActiveModel {
            is_favorite: Set(value),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        let result = retry::with_retry(&format!("set_favorite({})", id), self.retry_config, || async {
            contact::Entity::update_many()
                .set(patch.clone())
                .filter(contact::Column::Id.eq(&id_owned))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("更新收藏状态失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(CardshareError::not_found(format!("Contact not found: {}", id)));
        }
        Ok(())
    }

    pub async fn delete_contact(&self, id: &str) -> Result<()> {
        let db = &self.db;
        let id_owned = id.to_string();

        let result = retry::with_retry(&format!("delete_contact({})", id), self.retry_config, || async {
            contact::Entity::delete_by_id(&id_owned).exec(db).await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("删除联系人失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(CardshareError::not_found(format!("Contact not found: {}", id)));
        }

        info!("Contact deleted: {}", id);
        Ok(())
    }

    /// 时间窗口内新建的联系人数量，`until` 为开区间
    pub async fn count_contacts_created(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<u64> {
        let db = &self.db;

        let mut condition = Condition::all().add(contact::Column::UserId.eq(user_id));
        if let Some(since) = since {
            condition = condition.add(contact::Column::CreatedAt.gte(since));
        }
        if let Some(until) = until {
            condition = condition.add(contact::Column::CreatedAt.lt(until));
        }

        retry::with_retry("count_contacts_created", self.retry_config, || async {
            contact::Entity::find()
                .filter(condition.clone())
                .count(db)
                .await
        })
        .await
        .map_err(|e| CardshareError::database_operation(format!("统计联系人失败: {}", e)))
    }
}
