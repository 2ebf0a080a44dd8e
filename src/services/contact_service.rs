//! Contact management service
//!
//! 联系人 CRUD、收藏、从公开卡片保存，以及 CSV / JSON / vCard 导入导出。

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use ts_rs::TS;

use crate::api::constants::TS_EXPORT_PATH;
use crate::errors::{CardshareError, Result};
use crate::services::transfer::{
    self, ExportFile, ImportReport, ImportedContact, TransferFormat,
};
use crate::storage::{Contact, ContactFilter, SeaOrmStorage, SourceType};
use crate::utils::time_window::days_ago;
use crate::utils::url_validator::validate_optional_url;
use crate::utils::{generate_id, non_empty};

pub const DEFAULT_CONTACT_NAME: &str = "Unknown Contact";
const RECENT_DAYS: u32 = 30;

/// 列表过滤
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "lowercase")]
pub enum ContactListFilter {
    #[default]
    All,
    Favorites,
    /// 最近 30 天创建
    Recent,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ContactListQuery {
    pub search: Option<String>,
    pub filter: Option<ContactListFilter>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct CreateContactRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "crate::utils::flag::option::deserialize")]
    pub is_favorite: Option<bool>,
}

/// 部分更新：None 保持原值，空串清空
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct UpdateContactRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "crate::utils::flag::option::deserialize")]
    pub is_favorite: Option<bool>,
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn patch(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = non_empty(value);
    }
}

fn new_contact(user_id: &str, full_name: Option<String>, source_type: SourceType) -> Contact {
    let now = Utc::now();
    Contact {
        id: generate_id("contact"),
        user_id: user_id.to_string(),
        full_name: non_empty(full_name).unwrap_or_else(|| DEFAULT_CONTACT_NAME.to_string()),
        email: None,
        phone: None,
        company: None,
        job_title: None,
        website: None,
        notes: None,
        source_type,
        source_card_id: None,
        tags: Vec::new(),
        is_favorite: false,
        last_contacted: None,
        created_at: now,
        updated_at: now,
    }
}

fn imported_to_contact(user_id: &str, imported: ImportedContact) -> Contact {
    let mut c = new_contact(user_id, Some(imported.full_name), SourceType::Import);
    c.email = imported.email;
    c.phone = imported.phone;
    c.company = imported.company;
    c.job_title = imported.job_title;
    c.website = imported.website;
    c.notes = imported.notes;
    c.tags = imported.tags;
    c
}

pub struct ContactService {
    storage: Arc<SeaOrmStorage>,
}

impl ContactService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn create_contact(&self, user_id: &str, req: CreateContactRequest) -> Result<Contact> {
        validate_optional_url("website", req.website.as_deref())?;

        let mut c = new_contact(user_id, req.full_name, SourceType::Manual);
        c.email = non_empty(req.email);
        c.phone = non_empty(req.phone);
        c.company = non_empty(req.company);
        c.job_title = non_empty(req.job_title);
        c.website = non_empty(req.website);
        c.notes = non_empty(req.notes);
        c.tags = clean_tags(req.tags.unwrap_or_default());
        c.is_favorite = req.is_favorite.unwrap_or(false);

        self.storage.insert_contact(&c).await?;
        info!("Contact created: {} for user {}", c.id, user_id);
        Ok(c)
    }

    /// 全部联系人，最新在前
    pub async fn get_user_contacts(&self, user_id: &str) -> Result<Vec<Contact>> {
        self.storage
            .list_contacts_by_user(user_id, &ContactFilter::default())
            .await
    }

    /// 不区分大小写搜索姓名、邮箱、公司、职位，空查询返回全部
    pub async fn search_contacts(&self, user_id: &str, query: &str) -> Result<Vec<Contact>> {
        let filter = ContactFilter {
            search: Some(query.to_string()),
            ..Default::default()
        };
        self.storage.list_contacts_by_user(user_id, &filter).await
    }

    pub async fn list_contacts(&self, user_id: &str, query: ContactListQuery) -> Result<Vec<Contact>> {
        let mut filter = ContactFilter {
            search: query.search,
            ..Default::default()
        };
        match query.filter.unwrap_or_default() {
            ContactListFilter::All => {}
            ContactListFilter::Favorites => filter.favorites_only = true,
            ContactListFilter::Recent => {
                filter.created_after = Some(days_ago(Utc::now(), RECENT_DAYS));
            }
        }
        self.storage.list_contacts_by_user(user_id, &filter).await
    }

    pub async fn get_contact(&self, user_id: &str, contact_id: &str) -> Result<Contact> {
        self.storage
            .get_contact(contact_id)
            .await?
            .filter(|c| c.user_id == user_id)
            .ok_or_else(|| {
                CardshareError::not_found(format!("Contact not found: {}", contact_id))
            })
    }

    pub async fn update_contact(
        &self,
        user_id: &str,
        contact_id: &str,
        req: UpdateContactRequest,
    ) -> Result<Contact> {
        validate_optional_url("website", req.website.as_deref())?;
        let mut c = self.get_contact(user_id, contact_id).await?;

        if let Some(name) = non_empty(req.full_name) {
            c.full_name = name;
        }
        patch(&mut c.email, req.email);
        patch(&mut c.phone, req.phone);
        patch(&mut c.company, req.company);
        patch(&mut c.job_title, req.job_title);
        patch(&mut c.website, req.website);
        patch(&mut c.notes, req.notes);
        if let Some(tags) = req.tags {
            c.tags = clean_tags(tags);
        }
        if let Some(fav) = req.is_favorite {
            c.is_favorite = fav;
        }
        c.updated_at = Utc::now();

        self.storage.update_contact(&c).await?;
        Ok(c)
    }

    pub async fn delete_contact(&self, user_id: &str, contact_id: &str) -> Result<()> {
        self.get_contact(user_id, contact_id).await?;
        self.storage.delete_contact(contact_id).await
    }

    /// 翻转收藏状态，返回新值
    pub async fn toggle_favorite(&self, user_id: &str, contact_id: &str) -> Result<bool> {
        let c = self.get_contact(user_id, contact_id).await?;
        let value = !c.is_favorite;
        self.storage.set_favorite(contact_id, value).await?;
        Ok(value)
    }

    pub async fn mark_contacted(&self, user_id: &str, contact_id: &str) -> Result<Contact> {
        let mut c = self.get_contact(user_id, contact_id).await?;
        let now = Utc::now();
        c.last_contacted = Some(now);
        c.updated_at = now;
        self.storage.update_contact(&c).await?;
        Ok(c)
    }

    /// 把公开卡片保存为查看者的联系人，并给卡片的 contact_count + 1
    pub async fn save_card_as_contact(&self, viewer_id: &str, card_id: &str) -> Result<Contact> {
        let card = self
            .storage
            .get_public_card(card_id)
            .await?
            .ok_or_else(|| CardshareError::not_found(format!("Card not found: {}", card_id)))?;

        let name = card.full_name.clone().or_else(|| Some("Unknown".to_string()));
        let mut c = new_contact(viewer_id, name, SourceType::CardShare);
        c.email = card.email.clone();
        c.phone = card.phone.clone();
        c.company = card.company.clone();
        c.job_title = card.job_title.clone();
        c.website = card.website.clone();
        c.source_card_id = Some(card.id.clone());

        self.storage.insert_contact_from_card(&c, card_id).await?;
        info!("Card {} saved as contact {} by {}", card_id, c.id, viewer_id);
        Ok(c)
    }

    /// 解析后逐条写入，单条失败不影响其余行
    pub async fn import_contacts(
        &self,
        user_id: &str,
        format: TransferFormat,
        text: &str,
    ) -> Result<ImportReport> {
        let rows = transfer::parse_contacts(format, text)?;
        let mut report = ImportReport::default();

        for row in rows {
            let imported = match row {
                Ok(imported) => imported,
                Err(msg) => {
                    report.record_failure(msg);
                    continue;
                }
            };

            let name = imported.full_name.clone();
            let contact = imported_to_contact(user_id, imported);
            match self.storage.insert_contact(&contact).await {
                Ok(()) => report.record_success(),
                Err(e) => {
                    warn!("Import insert failed for '{}': {}", name, e);
                    report.record_failure(format!("{}: {}", name, e.message()));
                }
            }
        }

        info!(
            "Imported {} contacts for user {} ({}: {} ok, {} failed)",
            report.total, user_id, format, report.success, report.failed
        );
        Ok(report)
    }

    pub async fn export_contacts(&self, user_id: &str, format: TransferFormat) -> Result<ExportFile> {
        let contacts = self.get_user_contacts(user_id).await?;
        transfer::export_contacts(format, &contacts)
    }
}
