//! URL 验证模块
//!
//! 卡片和联系人上的链接字段只允许 http/https

use url::Url;

use crate::errors::{CardshareError, Result};

/// URL 验证错误
#[derive(Debug, PartialEq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::DangerousProtocol(proto) => write!(f, "Dangerous protocol blocked: {}", proto),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

const DANGEROUS_PROTOCOLS: &[&str] = &["javascript:", "data:", "file:", "vbscript:", "blob:"];

/// 验证单个 URL
pub fn validate_url(url: &str) -> std::result::Result<(), UrlValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let lower = url.to_lowercase();
    if let Some(proto) = DANGEROUS_PROTOCOLS.iter().find(|p| lower.starts_with(**p)) {
        return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
    }

    if !lower.starts_with("http://") && !lower.starts_with("https://") {
        let proto = lower
            .split(':')
            .next()
            .map(|s| format!("{}:", s))
            .unwrap_or_default();
        return Err(UrlValidationError::InvalidProtocol(proto));
    }

    Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    Ok(())
}

/// 是否为 http(s) 链接（不做完整解析）
pub fn is_http_url(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// 校验可选的 URL 字段，None 和空串直接通过
pub fn validate_optional_url(field: &str, value: Option<&str>) -> Result<()> {
    match value.map(str::trim) {
        None | Some("") => Ok(()),
        Some(url) => validate_url(url)
            .map_err(|e| CardshareError::validation(format!("{}: {}", field, e))),
    }
}
