use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 卡片模板
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CardTemplate {
    Modern,
    Classic,
    Creative,
    Executive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitalCard {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub template_id: String,
    pub is_active: bool,
    pub is_public: bool,

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

    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub share_count: u64,
    #[serde(default)]
    pub contact_count: u64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DigitalCard {
    /// 是否可被公开访问
    pub fn is_visible(&self) -> bool {
        self.is_public && self.is_active
    }

    /// 展示用名称，全名为空时退回卡片名
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.name)
    }
}

/// 联系人来源
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceType {
    #[default]
    Manual,
    Import,
    CardShare,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub user_id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
    pub source_type: SourceType,
    pub source_card_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_favorite: bool,
    pub last_contacted: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    pub id: i64,
    pub card_id: String,
    pub viewer_ip: Option<String>,
    pub viewer_user_agent: Option<String>,
    pub viewer_location: Option<String>,
    pub referrer: Option<String>,
    pub viewed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardShare {
    pub id: i64,
    pub card_id: String,
    pub share_method: String,
    pub shared_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialProfile {
    pub id: String,
    pub user_id: String,
    pub platform: String,
    pub username: String,
    pub url: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

pub const DEFAULT_SHARE_MESSAGE: &str = "Check out my digital business card!";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharingSettings {
    pub user_id: String,
    pub auto_share: bool,
    pub platforms: Vec<String>,
    pub include_qr: bool,
    pub custom_message: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl SharingSettings {
    /// 用户未保存设置时返回的默认值
    pub fn defaults_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            auto_share: false,
            platforms: Vec::new(),
            include_qr: true,
            custom_message: DEFAULT_SHARE_MESSAGE.to_string(),
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NfcTag {
    pub id: String,
    pub user_id: String,
    pub card_id: String,
    pub name: String,
    pub card_title: String,
    pub card_url: String,
    pub is_active: bool,
    pub write_count: u64,
    pub last_used: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StorageConfig {
    pub storage_type: String,
}
