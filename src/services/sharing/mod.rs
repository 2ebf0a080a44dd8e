//! Sharing service
//!
//! 二维码内容、NFC 标签、社交资料、分享设置与邮件签名。

mod nfc;
mod qr;
mod signature;
mod social;

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use crate::api::constants::TS_EXPORT_PATH;
use crate::config::get_config;
use crate::errors::{CardshareError, Result};
use crate::services::card_service::card_to_vcard;
use crate::storage::{DigitalCard, NfcTag, SeaOrmStorage, SharingSettings, SocialProfile};
use crate::utils::{generate_id, non_empty};

pub use nfc::{NdefRecord, ndef_message};
pub use qr::{
    CardContext, ErrorCorrection, EventInput, QrOptions, QrPayload, QrRequest, QrTemplate,
    WifiInput, build_qr_payload,
};
pub use signature::{
    ColorScheme, SignatureRequest, SignatureTemplate, SocialLink, render_signature,
};
pub use social::{SocialPlatform, profile_url, social_share_url};

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct CreateNfcTagRequest {
    pub card_id: String,
    pub name: Option<String>,
}

/// 写入标签后返回给客户端的内容
#[derive(Debug, Clone, Serialize)]
pub struct NfcWriteResult {
    pub tag: NfcTag,
    pub records: Vec<NdefRecord>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct SocialProfileRequest {
    pub platform: String,
    pub username: String,
    #[serde(default, deserialize_with = "crate::utils::flag::option::deserialize")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct UpdateSocialProfileRequest {
    pub username: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::flag::option::deserialize")]
    pub is_active: Option<bool>,
}

/// 分享设置保存请求，缺省字段保持当前值
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct SharingSettingsRequest {
    #[serde(default, deserialize_with = "crate::utils::flag::option::deserialize")]
    pub auto_share: Option<bool>,
    pub platforms: Option<Vec<String>>,
    #[serde(default, deserialize_with = "crate::utils::flag::option::deserialize")]
    pub include_qr: Option<bool>,
    pub custom_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ShareUrlResponse {
    pub platform: String,
    pub card_url: String,
    pub share_url: String,
}

pub struct SharingService {
    storage: Arc<SeaOrmStorage>,
}

impl SharingService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    async fn owned_card(&self, user_id: &str, card_id: &str) -> Result<DigitalCard> {
        self.storage
            .get_card(card_id)
            .await?
            .filter(|c| c.user_id == user_id)
            .ok_or_else(|| CardshareError::not_found(format!("Card not found: {}", card_id)))
    }

    fn card_context(card: &DigitalCard) -> CardContext {
        CardContext {
            card_url: get_config().public.card_url(&card.id),
            vcard: card_to_vcard(card).render(),
        }
    }

    // ---------------- QR ----------------

    /// 生成二维码内容；请求带 card_id 时必须是自己的卡片
    pub async fn build_qr(&self, user_id: &str, req: QrRequest) -> Result<QrPayload> {
        let options = req.options.clone().unwrap_or_default();
        options.validate()?;

        let context = match req.card_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(card_id) => Some(Self::card_context(&self.owned_card(user_id, card_id).await?)),
            None => None,
        };

        let payload = build_qr_payload(&req, context.as_ref())?;
        Ok(QrPayload {
            template: req.template,
            payload,
            options,
        })
    }

    pub async fn qr_for_card(
        &self,
        user_id: &str,
        card_id: &str,
        template: QrTemplate,
        data: Option<String>,
    ) -> Result<QrPayload> {
        self.build_qr(
            user_id,
            QrRequest {
                template,
                data,
                card_id: Some(card_id.to_string()),
                ..Default::default()
            },
        )
        .await
    }

    // ---------------- NFC ----------------

    pub async fn create_nfc_tag(&self, user_id: &str, req: CreateNfcTagRequest) -> Result<NfcTag> {
        let card = self.owned_card(user_id, &req.card_id).await?;
        let tag = NfcTag {
            id: generate_id("nfc"),
            user_id: user_id.to_string(),
            card_id: card.id.clone(),
            name: non_empty(req.name).unwrap_or_else(|| format!("{} tag", card.name)),
            card_title: card.display_name().to_string(),
            card_url: get_config().public.card_url(&card.id),
            is_active: true,
            write_count: 0,
            last_used: None,
            created_at: Utc::now(),
        };

        self.storage.insert_nfc_tag(&tag).await?;
        info!("NFC tag {} created for card {}", tag.id, card.id);
        Ok(tag)
    }

    pub async fn list_nfc_tags(&self, user_id: &str) -> Result<Vec<NfcTag>> {
        self.storage.list_nfc_tags(user_id).await
    }

    async fn owned_nfc_tag(&self, user_id: &str, tag_id: &str) -> Result<NfcTag> {
        self.storage
            .get_nfc_tag(tag_id)
            .await?
            .filter(|t| t.user_id == user_id)
            .ok_or_else(|| CardshareError::not_found(format!("NFC tag not found: {}", tag_id)))
    }

    pub async fn delete_nfc_tag(&self, user_id: &str, tag_id: &str) -> Result<()> {
        self.owned_nfc_tag(user_id, tag_id).await?;
        self.storage.delete_nfc_tag(tag_id).await
    }

    pub async fn toggle_nfc_tag(&self, user_id: &str, tag_id: &str) -> Result<NfcTag> {
        let mut tag = self.owned_nfc_tag(user_id, tag_id).await?;
        tag.is_active = !tag.is_active;
        self.storage.set_nfc_tag_active(tag_id, tag.is_active).await?;
        Ok(tag)
    }

    /// 记录一次写入，返回最新的标签和 NDEF 记录
    pub async fn record_nfc_write(&self, user_id: &str, tag_id: &str) -> Result<NfcWriteResult> {
        let tag = self.owned_nfc_tag(user_id, tag_id).await?;
        if !tag.is_active {
            return Err(CardshareError::validation(format!(
                "NFC tag is inactive: {}",
                tag_id
            )));
        }
        self.storage.record_nfc_write(tag_id).await?;

        let tag = self.owned_nfc_tag(user_id, tag_id).await?;
        let records = ndef_message(&tag);
        Ok(NfcWriteResult { tag, records })
    }

    // ---------------- social profiles ----------------

    pub async fn add_social_profile(
        &self,
        user_id: &str,
        req: SocialProfileRequest,
    ) -> Result<SocialProfile> {
        let platform = SocialPlatform::parse(&req.platform)?;
        let url = profile_url(platform, &req.username)?;

        let profile = SocialProfile {
            id: generate_id("social"),
            user_id: user_id.to_string(),
            platform: platform.to_string(),
            username: req.username.trim().trim_start_matches('@').to_string(),
            url,
            is_active: req.is_active.unwrap_or(true),
            created_at: Utc::now(),
        };
        self.storage.insert_social_profile(&profile).await?;
        Ok(profile)
    }

    pub async fn list_social_profiles(&self, user_id: &str) -> Result<Vec<SocialProfile>> {
        self.storage.list_social_profiles(user_id).await
    }

    async fn owned_social_profile(&self, user_id: &str, id: &str) -> Result<SocialProfile> {
        self.storage
            .get_social_profile(id)
            .await?
            .filter(|p| p.user_id == user_id)
            .ok_or_else(|| CardshareError::not_found(format!("Social profile not found: {}", id)))
    }

    pub async fn update_social_profile(
        &self,
        user_id: &str,
        id: &str,
        req: UpdateSocialProfileRequest,
    ) -> Result<SocialProfile> {
        let mut profile = self.owned_social_profile(user_id, id).await?;

        if let Some(username) = non_empty(req.username) {
            let platform = SocialPlatform::parse(&profile.platform)?;
            profile.url = profile_url(platform, &username)?;
            profile.username = username.trim_start_matches('@').to_string();
        }
        if let Some(active) = req.is_active {
            profile.is_active = active;
        }

        self.storage.update_social_profile(&profile).await?;
        Ok(profile)
    }

    pub async fn delete_social_profile(&self, user_id: &str, id: &str) -> Result<()> {
        self.owned_social_profile(user_id, id).await?;
        self.storage.delete_social_profile(id).await
    }

    // ---------------- settings ----------------

    /// 未保存过时返回默认值
    pub async fn get_settings(&self, user_id: &str) -> Result<SharingSettings> {
        Ok(self
            .storage
            .get_sharing_settings(user_id)
            .await?
            .unwrap_or_else(|| SharingSettings::defaults_for(user_id)))
    }

    pub async fn save_settings(
        &self,
        user_id: &str,
        req: SharingSettingsRequest,
    ) -> Result<SharingSettings> {
        let mut settings = self.get_settings(user_id).await?;

        if let Some(auto_share) = req.auto_share {
            settings.auto_share = auto_share;
        }
        if let Some(platforms) = req.platforms {
            let mut parsed = Vec::with_capacity(platforms.len());
            for p in platforms.iter().filter(|p| !p.trim().is_empty()) {
                let name = SocialPlatform::parse(p)?.to_string();
                if !parsed.contains(&name) {
                    parsed.push(name);
                }
            }
            settings.platforms = parsed;
        }
        if let Some(include_qr) = req.include_qr {
            settings.include_qr = include_qr;
        }
        if let Some(message) = non_empty(req.custom_message) {
            settings.custom_message = message;
        }

        self.storage.upsert_sharing_settings(&settings).await?;
        settings.updated_at = Some(Utc::now());
        Ok(settings)
    }

    /// 社交平台分享链接，文案取自分享设置
    pub async fn share_url(
        &self,
        user_id: &str,
        platform: &str,
        card_id: &str,
    ) -> Result<ShareUrlResponse> {
        let card = self.owned_card(user_id, card_id).await?;
        let settings = self.get_settings(user_id).await?;
        let card_url = get_config().public.card_url(&card.id);
        let share_url = social_share_url(platform, &card_url, &settings.custom_message)?;

        Ok(ShareUrlResponse {
            platform: platform.trim().to_ascii_lowercase(),
            card_url,
            share_url,
        })
    }

    // ---------------- signature ----------------

    pub fn render_signature(&self, req: &SignatureRequest) -> Result<String> {
        render_signature(req)
    }

    /// 用卡片内容预填签名请求
    pub async fn prefill_signature(
        &self,
        user_id: &str,
        card_id: &str,
        template: Option<SignatureTemplate>,
        color_scheme: Option<ColorScheme>,
    ) -> Result<SignatureRequest> {
        let card = self.owned_card(user_id, card_id).await?;
        let mut req = SignatureRequest::from_card(&card);
        if let Some(template) = template {
            req.template = template;
        }
        if let Some(scheme) = color_scheme {
            req.color_scheme = scheme;
        }
        Ok(req)
    }
}
