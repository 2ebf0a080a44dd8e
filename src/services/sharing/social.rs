//! 社交平台链接

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use ts_rs::TS;

use crate::api::constants::TS_EXPORT_PATH;
use crate::errors::{CardshareError, Result};
use crate::utils::url_validator::{is_http_url, validate_url};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    TS,
)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SocialPlatform {
    Linkedin,
    Twitter,
    Instagram,
    Facebook,
    Youtube,
    Github,
    Tiktok,
    Website,
}

impl SocialPlatform {
    /// 个人主页前缀，website 没有前缀
    pub fn base_url(self) -> Option<&'static str> {
        match self {
            SocialPlatform::Linkedin => Some("https://linkedin.com/in/"),
            SocialPlatform::Twitter => Some("https://twitter.com/"),
            SocialPlatform::Instagram => Some("https://instagram.com/"),
            SocialPlatform::Facebook => Some("https://facebook.com/"),
            SocialPlatform::Youtube => Some("https://youtube.com/@"),
            SocialPlatform::Github => Some("https://github.com/"),
            SocialPlatform::Tiktok => Some("https://tiktok.com/@"),
            SocialPlatform::Website => None,
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        SocialPlatform::from_str(raw.trim())
            .map_err(|_| CardshareError::validation(format!("Unsupported platform: {}", raw)))
    }
}

/// 用户名 -> 主页链接，已经是 http(s) 链接时原样返回
pub fn profile_url(platform: SocialPlatform, username: &str) -> Result<String> {
    let username = username.trim();
    if username.is_empty() {
        return Err(CardshareError::validation("username cannot be empty"));
    }

    if is_http_url(username) {
        validate_url(username)
            .map_err(|e| CardshareError::validation(format!("url: {}", e)))?;
        return Ok(username.to_string());
    }

    match platform.base_url() {
        Some(base) => Ok(format!("{}{}", base, username.trim_start_matches('@'))),
        None => Err(CardshareError::validation(
            "website profiles need a full http(s) URL",
        )),
    }
}

/// 社交平台分享链接
pub fn social_share_url(platform: &str, card_url: &str, message: &str) -> Result<String> {
    let url = urlencoding::encode(card_url);
    match platform.trim().to_ascii_lowercase().as_str() {
        "twitter" => Ok(format!(
            "https://twitter.com/intent/tweet?text={}&url={}",
            urlencoding::encode(message),
            url
        )),
        "facebook" => Ok(format!(
            "https://www.facebook.com/sharer/sharer.php?u={}",
            url
        )),
        "linkedin" => Ok(format!(
            "https://www.linkedin.com/sharing/share-offsite/?url={}",
            url
        )),
        other => Err(CardshareError::validation(format!(
            "Sharing is not supported for platform: {}",
            other
        ))),
    }
}
