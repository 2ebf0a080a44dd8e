//! 邮件签名 HTML
//!
//! 输出使用内联样式和 table 布局，所有插值都经过 HTML 转义。

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::api::constants::TS_EXPORT_PATH;
use crate::errors::{CardshareError, Result};
use crate::storage::DigitalCard;
use crate::utils::escape_html;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "lowercase")]
pub enum SignatureTemplate {
    #[default]
    Modern,
    Classic,
    Minimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
    Gray,
    Red,
}

impl ColorScheme {
    /// (primary, secondary)
    pub fn colors(self) -> (&'static str, &'static str) {
        match self {
            ColorScheme::Blue => ("#2563EB", "#64748B"),
            ColorScheme::Green => ("#059669", "#6B7280"),
            ColorScheme::Purple => ("#7C3AED", "#9CA3AF"),
            ColorScheme::Orange => ("#EA580C", "#71717A"),
            ColorScheme::Gray => ("#374151", "#9CA3AF"),
            ColorScheme::Red => ("#DC2626", "#6B7280"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

impl SocialLink {
    fn icon(&self) -> &'static str {
        match self.platform.to_ascii_lowercase().as_str() {
            "linkedin" => "🔗",
            "twitter" => "🐦",
            "instagram" => "📷",
            "facebook" => "👥",
            "youtube" => "📺",
            _ => "🌐",
        }
    }
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_font_size() -> u32 {
    14
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct SignatureRequest {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub company_logo: Option<String>,
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub disclaimer: Option<String>,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    #[serde(default)]
    pub template: SignatureTemplate,
    #[serde(default)]
    pub color_scheme: ColorScheme,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_true", deserialize_with = "crate::utils::flag::deserialize")]
    pub include_image: bool,
    #[serde(default = "default_true", deserialize_with = "crate::utils::flag::deserialize")]
    pub include_logo: bool,
    #[serde(default = "default_true", deserialize_with = "crate::utils::flag::deserialize")]
    pub include_social: bool,
    #[serde(default, deserialize_with = "crate::utils::flag::deserialize")]
    pub include_quote: bool,
    #[serde(default, deserialize_with = "crate::utils::flag::deserialize")]
    pub include_disclaimer: bool,
}

impl SignatureRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            company: None,
            email: None,
            phone: None,
            website: None,
            address: None,
            profile_image: None,
            company_logo: None,
            quote: None,
            disclaimer: None,
            social_links: Vec::new(),
            template: SignatureTemplate::default(),
            color_scheme: ColorScheme::default(),
            font_family: default_font_family(),
            font_size: default_font_size(),
            include_image: true,
            include_logo: true,
            include_social: true,
            include_quote: false,
            include_disclaimer: false,
        }
    }

    /// 用卡片内容预填
    pub fn from_card(card: &DigitalCard) -> Self {
        let mut req = Self::new(card.display_name());
        req.title = card.job_title.clone();
        req.company = card.company.clone();
        req.email = card.email.clone();
        req.phone = card.phone.clone();
        req.website = card.website.clone();
        req.profile_image = card.profile_image_url.clone();
        req.company_logo = card.company_logo_url.clone();
        req.social_links = [
            ("linkedin", &card.linkedin_url),
            ("twitter", &card.twitter_url),
            ("instagram", &card.instagram_url),
            ("facebook", &card.facebook_url),
        ]
        .into_iter()
        .filter_map(|(platform, url)| {
            url.as_ref().map(|url| SocialLink {
                platform: platform.to_string(),
                url: url.clone(),
            })
        })
        .collect();
        req
    }
}

/// 非空字段的转义值
fn field(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(escape_html)
}

pub fn render_signature(req: &SignatureRequest) -> Result<String> {
    if req.name.trim().is_empty() {
        return Err(CardshareError::validation("name is required"));
    }
    if !(8..=32).contains(&req.font_size) {
        return Err(CardshareError::validation(
            "font_size must be between 8 and 32",
        ));
    }

    let html = match req.template {
        SignatureTemplate::Modern => render_modern(req),
        SignatureTemplate::Classic => render_classic(req),
        SignatureTemplate::Minimal => render_minimal(req),
    };
    Ok(html)
}

fn base_style(req: &SignatureRequest, secondary: &str) -> String {
    format!(
        "font-family: {}, sans-serif; font-size: {}px; line-height: 1.4; color: {};",
        escape_html(&req.font_family),
        req.font_size,
        secondary
    )
}

// write! 到 String 不会失败
fn render_modern(req: &SignatureRequest) -> String {
    let (primary, secondary) = req.color_scheme.colors();
    let name = escape_html(req.name.trim());
    let mut html = String::new();

    let _ = write!(html, r#"<div style="{}">"#, base_style(req, secondary));
    html.push_str(r#"<table cellpadding="0" cellspacing="0" border="0" style="border-collapse: collapse;"><tr>"#);

    if req.include_image
        && let Some(image) = field(&req.profile_image)
    {
        let _ = write!(
            html,
            r#"<td style="padding-right: 20px; vertical-align: top;"><img src="{}" alt="{}" style="width: 80px; height: 80px; border-radius: 50%; object-fit: cover;"></td>"#,
            image, name
        );
    }

    html.push_str(r#"<td style="vertical-align: top;">"#);
    let _ = write!(
        html,
        r#"<div style="color: {}; font-size: {}px; font-weight: bold; margin-bottom: 5px;">{}</div>"#,
        primary,
        req.font_size + 4,
        name
    );
    if let Some(title) = field(&req.title) {
        let _ = write!(
            html,
            r#"<div style="color: {}; margin-bottom: 3px;">{}</div>"#,
            secondary, title
        );
    }
    if let Some(company) = field(&req.company) {
        let _ = write!(
            html,
            r#"<div style="color: {}; font-weight: 600; margin-bottom: 8px;">{}</div>"#,
            primary, company
        );
    }
    if let Some(email) = field(&req.email) {
        let _ = write!(
            html,
            r#"<div style="margin-bottom: 3px;"><a href="mailto:{0}" style="color: {1}; text-decoration: none;">📧 {0}</a></div>"#,
            email, secondary
        );
    }
    if let Some(phone) = field(&req.phone) {
        let _ = write!(
            html,
            r#"<div style="margin-bottom: 3px;"><a href="tel:{0}" style="color: {1}; text-decoration: none;">📞 {0}</a></div>"#,
            phone, secondary
        );
    }
    if let Some(website) = field(&req.website) {
        let _ = write!(
            html,
            r#"<div style="margin-bottom: 3px;"><a href="{0}" style="color: {1}; text-decoration: none;">🌐 {0}</a></div>"#,
            website, secondary
        );
    }
    if let Some(address) = field(&req.address) {
        let _ = write!(
            html,
            r#"<div style="margin-bottom: 8px; color: {}; ">📍 {}</div>"#,
            secondary, address
        );
    }
    if req.include_social && !req.social_links.is_empty() {
        html.push_str(r#"<div style="margin-top: 10px;">"#);
        for link in req.social_links.iter().filter(|l| !l.url.trim().is_empty()) {
            let _ = write!(
                html,
                r#"<a href="{}" style="margin-right: 10px; text-decoration: none; font-size: 16px;">{}</a>"#,
                escape_html(link.url.trim()),
                link.icon()
            );
        }
        html.push_str("</div>");
    }
    html.push_str("</td></tr></table>");

    push_footer(&mut html, req, primary, secondary);
    html.push_str("</div>");
    html
}

fn render_classic(req: &SignatureRequest) -> String {
    let (primary, secondary) = req.color_scheme.colors();
    let name = escape_html(req.name.trim());
    let company = field(&req.company);
    let mut html = String::new();

    let _ = write!(html, r#"<div style="{}">"#, base_style(req, secondary));
    html.push_str(r#"<table cellpadding="0" cellspacing="0" border="0" style="border-collapse: collapse;"><tr><td style="vertical-align: top;">"#);

    if req.include_logo
        && let Some(logo) = field(&req.company_logo)
    {
        let _ = write!(
            html,
            r#"<img src="{}" alt="{}" style="width: 120px; height: auto; margin-bottom: 10px;">"#,
            logo,
            company.as_deref().unwrap_or("")
        );
    }

    let _ = write!(
        html,
        r#"<div style="color: {}; font-size: {}px; font-weight: bold; margin-bottom: 5px;">{}</div>"#,
        primary,
        req.font_size + 2,
        name
    );
    if let Some(title) = field(&req.title) {
        let _ = write!(
            html,
            r#"<div style="color: {}; margin-bottom: 2px;">{}</div>"#,
            secondary, title
        );
    }
    if let Some(company) = &company {
        let _ = write!(
            html,
            r#"<div style="color: {}; font-weight: 600; margin-bottom: 10px;">{}</div>"#,
            primary, company
        );
    }

    html.push_str(r#"<table cellpadding="0" cellspacing="0" border="0">"#);
    let rows = [
        ("Email", field(&req.email).map(|v| (format!("mailto:{}", v), v))),
        ("Phone", field(&req.phone).map(|v| (format!("tel:{}", v), v))),
        ("Web", field(&req.website).map(|v| (v.clone(), v))),
    ];
    for (label, value) in rows {
        if let Some((href, text)) = value {
            let _ = write!(
                html,
                r#"<tr><td style="padding: 2px 0;"><strong>{}:</strong></td><td style="padding: 2px 0 2px 10px;"><a href="{}" style="color: {}; text-decoration: none;">{}</a></td></tr>"#,
                label, href, secondary, text
            );
        }
    }
    if let Some(address) = field(&req.address) {
        let _ = write!(
            html,
            r#"<tr><td style="padding: 2px 0; vertical-align: top;"><strong>Address:</strong></td><td style="padding: 2px 0 2px 10px;">{}</td></tr>"#,
            address
        );
    }
    html.push_str("</table></td></tr></table>");

    push_footer(&mut html, req, primary, secondary);
    html.push_str("</div>");
    html
}

fn render_minimal(req: &SignatureRequest) -> String {
    let (primary, secondary) = req.color_scheme.colors();
    let mut html = String::new();

    let _ = write!(html, r#"<div style="{}">"#, base_style(req, secondary));
    let _ = write!(
        html,
        r#"<div style="color: {}; font-size: {}px; font-weight: 600; margin-bottom: 5px;">{}</div>"#,
        primary,
        req.font_size + 2,
        escape_html(req.name.trim())
    );
    if let Some(title) = field(&req.title) {
        let _ = write!(
            html,
            r#"<div style="color: {}; margin-bottom: 10px;">{}</div>"#,
            secondary, title
        );
    }
    let line: Vec<String> = [&req.email, &req.phone, &req.website]
        .into_iter()
        .filter_map(field)
        .collect();
    let _ = write!(
        html,
        r#"<div style="color: {};">{}</div>"#,
        secondary,
        line.join(" • ")
    );
    html.push_str("</div>");
    html
}

fn push_footer(html: &mut String, req: &SignatureRequest, primary: &str, secondary: &str) {
    if req.include_quote
        && let Some(quote) = field(&req.quote)
    {
        let _ = write!(
            html,
            r#"<div style="margin-top: 15px; padding-top: 10px; border-top: 2px solid {}; font-style: italic; color: {};">&quot;{}&quot;</div>"#,
            primary, secondary, quote
        );
    }
    if req.include_disclaimer
        && let Some(disclaimer) = field(&req.disclaimer)
    {
        let _ = write!(
            html,
            r#"<div style="margin-top: 15px; font-size: {}px; color: #9CA3AF; border-top: 1px solid #E5E7EB; padding-top: 10px;">{}</div>"#,
            req.font_size.saturating_sub(2),
            disclaimer
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SignatureRequest {
        let mut req = SignatureRequest::new("Ada <Lovelace>");
        req.title = Some("Analyst".into());
        req.email = Some("ada@x.org".into());
        req.phone = Some("+44 1".into());
        req.website = Some("https://ada.dev".into());
        req
    }

    #[test]
    fn test_name_required() {
        let req = SignatureRequest::new("  ");
        assert!(render_signature(&req).is_err());
    }

    #[test]
    fn test_modern_escapes_and_uses_scheme() {
        let html = render_signature(&sample()).unwrap();
        assert!(html.contains("Ada &lt;Lovelace&gt;"));
        assert!(!html.contains("<Lovelace>"));
        assert!(html.contains("#2563EB"));
        assert!(html.contains("mailto:ada@x.org"));
    }

    #[test]
    fn test_minimal_joins_contact_line() {
        let mut req = sample();
        req.template = SignatureTemplate::Minimal;
        req.color_scheme = ColorScheme::Green;
        let html = render_signature(&req).unwrap();
        assert!(html.contains("ada@x.org • +44 1 • https://ada.dev"));
        assert!(html.contains("#059669"));
    }

    #[test]
    fn test_classic_label_table() {
        let mut req = sample();
        req.template = SignatureTemplate::Classic;
        let html = render_signature(&req).unwrap();
        assert!(html.contains("<strong>Email:</strong>"));
        assert!(html.contains("<strong>Web:</strong>"));
        assert!(!html.contains("<strong>Address:</strong>"));
    }

    #[test]
    fn test_quote_only_when_enabled() {
        let mut req = sample();
        req.quote = Some("Imagination is the discovering faculty".into());
        assert!(!render_signature(&req).unwrap().contains("discovering"));
        req.include_quote = true;
        assert!(render_signature(&req).unwrap().contains("discovering"));
    }

    #[test]
    fn test_request_defaults_from_json() {
        let req: SignatureRequest =
            serde_json::from_str(r#"{"name":"Ada","template":"classic","include_quote":"1"}"#)
                .unwrap();
        assert_eq!(req.template, SignatureTemplate::Classic);
        assert_eq!(req.font_family, "Arial");
        assert_eq!(req.font_size, 14);
        assert!(req.include_quote);
        assert!(req.include_social);
    }
}
