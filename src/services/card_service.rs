//! Digital card service
//!
//! 卡片的增删改查、公开访问与 vCard 输出。所有者校验在这一层完成，
//! 访问别人的卡片一律按 NotFound 处理。

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use crate::api::constants::TS_EXPORT_PATH;
use crate::config::get_config;
use crate::errors::{CardshareError, Result};
use crate::services::transfer::vcard::VCard;
use crate::storage::{CardTemplate, DigitalCard, SeaOrmStorage};
use crate::utils::url_validator::validate_optional_url;
use crate::utils::{generate_id, is_hex_color, non_empty};

pub const DEFAULT_CARD_NAME: &str = "My Business Card";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#2563EB";
pub const DEFAULT_TEXT_COLOR: &str = "#FFFFFF";
pub const DEFAULT_ACCENT_COLOR: &str = "#F59E0B";
pub const DEFAULT_FONT_FAMILY: &str = "Inter";

/// 创建卡片请求，缺省字段使用默认值
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct CreateCardRequest {
    pub name: Option<String>,
    pub template_id: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::flag::option::deserialize")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "crate::utils::flag::option::deserialize")]
    pub is_public: Option<bool>,
    pub full_name: Option<String>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub company_logo_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub instagram_url: Option<String>,
    pub facebook_url: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub accent_color: Option<String>,
    pub font_family: Option<String>,
}

/// 部分更新：None 保持原值，可选文本字段传空串表示清空
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct UpdateCardRequest {
    pub name: Option<String>,
    pub template_id: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::flag::option::deserialize")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "crate::utils::flag::option::deserialize")]
    pub is_public: Option<bool>,
    pub full_name: Option<String>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub company_logo_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub instagram_url: Option<String>,
    pub facebook_url: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub accent_color: Option<String>,
    pub font_family: Option<String>,
}

/// 公开页面可见的卡片内容（不含 user_id 与计数器）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PublicCardView {
    pub id: String,
    pub name: String,
    pub template_id: String,
    pub full_name: Option<String>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub company_logo_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub instagram_url: Option<String>,
    pub facebook_url: Option<String>,
    pub background_color: String,
    pub text_color: String,
    pub accent_color: String,
    pub font_family: String,
    pub card_url: String,
}

impl From<&DigitalCard> for PublicCardView {
    fn from(card: &DigitalCard) -> Self {
        Self {
            id: card.id.clone(),
            name: card.name.clone(),
            template_id: card.template_id.clone(),
            full_name: card.full_name.clone(),
            job_title: card.job_title.clone(),
            company: card.company.clone(),
            email: card.email.clone(),
            phone: card.phone.clone(),
            website: card.website.clone(),
            bio: card.bio.clone(),
            profile_image_url: card.profile_image_url.clone(),
            company_logo_url: card.company_logo_url.clone(),
            linkedin_url: card.linkedin_url.clone(),
            twitter_url: card.twitter_url.clone(),
            instagram_url: card.instagram_url.clone(),
            facebook_url: card.facebook_url.clone(),
            background_color: card.background_color.clone(),
            text_color: card.text_color.clone(),
            accent_color: card.accent_color.clone(),
            font_family: card.font_family.clone(),
            card_url: get_config().public.card_url(&card.id),
        }
    }
}

/// 卡片 -> vCard，社交链接带 TYPE 参数
pub fn card_to_vcard(card: &DigitalCard) -> VCard {
    let mut urls = Vec::new();
    let links = [
        (None, &card.website),
        (Some("linkedin"), &card.linkedin_url),
        (Some("twitter"), &card.twitter_url),
        (Some("instagram"), &card.instagram_url),
        (Some("facebook"), &card.facebook_url),
    ];
    for (kind, url) in links {
        if let Some(url) = url {
            urls.push((kind, url.clone()));
        }
    }

    VCard {
        full_name: card.display_name().to_string(),
        email: card.email.clone(),
        phone: card.phone.clone(),
        company: card.company.clone(),
        job_title: card.job_title.clone(),
        urls,
        note: card.bio.clone(),
    }
}

/// 模板、颜色、链接字段校验
pub fn validate_card(card: &DigitalCard) -> Result<()> {
    if card.name.trim().is_empty() {
        return Err(CardshareError::validation("name cannot be empty"));
    }

    CardTemplate::from_str(&card.template_id).map_err(|_| {
        CardshareError::validation(format!(
            "Unknown template: {}. Expected modern, classic, creative or executive",
            card.template_id
        ))
    })?;

    for (field, color) in [
        ("background_color", &card.background_color),
        ("text_color", &card.text_color),
        ("accent_color", &card.accent_color),
    ] {
        if !is_hex_color(color) {
            return Err(CardshareError::validation(format!(
                "{}: expected #RRGGBB, got {}",
                field, color
            )));
        }
    }

    for (field, url) in [
        ("website", &card.website),
        ("profile_image_url", &card.profile_image_url),
        ("company_logo_url", &card.company_logo_url),
        ("linkedin_url", &card.linkedin_url),
        ("twitter_url", &card.twitter_url),
        ("instagram_url", &card.instagram_url),
        ("facebook_url", &card.facebook_url),
    ] {
        validate_optional_url(field, url.as_deref())?;
    }

    Ok(())
}

/// 部分更新的可选文本字段：None 保持，空串清空
fn patch(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = non_empty(value);
    }
}

/// 必填文本字段：None 或空串都保持原值
fn patch_required(slot: &mut String, value: Option<String>) {
    if let Some(v) = non_empty(value) {
        *slot = v;
    }
}

pub struct CardService {
    storage: Arc<SeaOrmStorage>,
}

impl CardService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn create_card(&self, user_id: &str, req: CreateCardRequest) -> Result<DigitalCard> {
        let now = Utc::now();
        let card = DigitalCard {
            id: generate_id("card"),
            user_id: user_id.to_string(),
            name: non_empty(req.name).unwrap_or_else(|| DEFAULT_CARD_NAME.to_string()),
            template_id: non_empty(req.template_id)
                .map(|t| t.to_ascii_lowercase())
                .unwrap_or_else(|| CardTemplate::Modern.to_string()),
            is_active: req.is_active.unwrap_or(true),
            is_public: req.is_public.unwrap_or(true),
            full_name: non_empty(req.full_name),
            job_title: non_empty(req.job_title),
            company: non_empty(req.company),
            email: non_empty(req.email),
            phone: non_empty(req.phone),
            website: non_empty(req.website),
            bio: non_empty(req.bio),
            profile_image_url: non_empty(req.profile_image_url),
            company_logo_url: non_empty(req.company_logo_url),
            linkedin_url: non_empty(req.linkedin_url),
            twitter_url: non_empty(req.twitter_url),
            instagram_url: non_empty(req.instagram_url),
            facebook_url: non_empty(req.facebook_url),
            background_color: non_empty(req.background_color)
                .unwrap_or_else(|| DEFAULT_BACKGROUND_COLOR.to_string()),
            text_color: non_empty(req.text_color)
                .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
            accent_color: non_empty(req.accent_color)
                .unwrap_or_else(|| DEFAULT_ACCENT_COLOR.to_string()),
            font_family: non_empty(req.font_family)
                .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string()),
            view_count: 0,
            share_count: 0,
            contact_count: 0,
            created_at: now,
            updated_at: now,
        };

        validate_card(&card)?;
        self.storage.insert_card(&card).await?;
        info!("Card created: {} for user {}", card.id, user_id);
        Ok(card)
    }

    /// 当前用户的卡片，最新在前
    pub async fn get_user_cards(&self, user_id: &str) -> Result<Vec<DigitalCard>> {
        self.storage.list_cards_by_user(user_id).await
    }

    pub async fn get_card(&self, user_id: &str, card_id: &str) -> Result<DigitalCard> {
        self.storage
            .get_card(card_id)
            .await?
            .filter(|c| c.user_id == user_id)
            .ok_or_else(|| CardshareError::not_found(format!("Card not found: {}", card_id)))
    }

    /// 公开且启用的卡片
    pub async fn get_public_card(&self, card_id: &str) -> Result<DigitalCard> {
        self.storage
            .get_public_card(card_id)
            .await?
            .ok_or_else(|| CardshareError::not_found(format!("Card not found: {}", card_id)))
    }

    pub async fn update_card(
        &self,
        user_id: &str,
        card_id: &str,
        req: UpdateCardRequest,
    ) -> Result<DigitalCard> {
        let mut card = self.get_card(user_id, card_id).await?;

        patch_required(&mut card.name, req.name);
        patch_required(
            &mut card.template_id,
            req.template_id.map(|t| t.to_ascii_lowercase()),
        );
        if let Some(active) = req.is_active {
            card.is_active = active;
        }
        if let Some(public) = req.is_public {
            card.is_public = public;
        }
        patch(&mut card.full_name, req.full_name);
        patch(&mut card.job_title, req.job_title);
        patch(&mut card.company, req.company);
        patch(&mut card.email, req.email);
        patch(&mut card.phone, req.phone);
        patch(&mut card.website, req.website);
        patch(&mut card.bio, req.bio);
        patch(&mut card.profile_image_url, req.profile_image_url);
        patch(&mut card.company_logo_url, req.company_logo_url);
        patch(&mut card.linkedin_url, req.linkedin_url);
        patch(&mut card.twitter_url, req.twitter_url);
        patch(&mut card.instagram_url, req.instagram_url);
        patch(&mut card.facebook_url, req.facebook_url);
        patch_required(&mut card.background_color, req.background_color);
        patch_required(&mut card.text_color, req.text_color);
        patch_required(&mut card.accent_color, req.accent_color);
        patch_required(&mut card.font_family, req.font_family);
        card.updated_at = Utc::now();

        validate_card(&card)?;
        self.storage.update_card(&card).await?;
        info!("Card updated: {}", card.id);
        Ok(card)
    }

    pub async fn delete_card(&self, user_id: &str, card_id: &str) -> Result<()> {
        // 先校验归属
        self.get_card(user_id, card_id).await?;
        self.storage.delete_card(card_id).await
    }

    /// 切换启用状态，返回更新后的卡片
    pub async fn toggle_active(&self, user_id: &str, card_id: &str) -> Result<DigitalCard> {
        let mut card = self.get_card(user_id, card_id).await?;
        card.is_active = !card.is_active;
        card.updated_at = Utc::now();
        self.storage.update_card(&card).await?;
        info!("Card {} is_active -> {}", card.id, card.is_active);
        Ok(card)
    }

    pub fn card_url(&self, card_id: &str) -> String {
        get_config().public.card_url(card_id)
    }

    /// 公开卡片的 vCard 文本
    pub async fn card_vcard(&self, card_id: &str) -> Result<(DigitalCard, String)> {
        let card = self.get_public_card(card_id).await?;
        let body = card_to_vcard(&card).render();
        Ok((card, body))
    }
}
