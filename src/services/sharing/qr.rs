//! 二维码内容生成
//!
//! 只生成要编码的字符串，图片渲染交给客户端。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::api::constants::TS_EXPORT_PATH;
use crate::errors::{CardshareError, Result};
use crate::utils::is_hex_color;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "lowercase")]
pub enum QrTemplate {
    #[default]
    Url,
    Email,
    Phone,
    Sms,
    Wifi,
    Location,
    Vcard,
    Event,
}

impl QrTemplate {
    /// 需要补全的 URI 前缀
    fn prefix(self) -> Option<&'static str> {
        match self {
            QrTemplate::Email => Some("mailto:"),
            QrTemplate::Phone => Some("tel:"),
            QrTemplate::Sms => Some("sms:"),
            QrTemplate::Location => Some("geo:"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

fn default_margin() -> u32 {
    4
}

fn default_width() -> u32 {
    256
}

fn default_dark() -> String {
    "#000000".to_string()
}

fn default_light() -> String {
    "#FFFFFF".to_string()
}

/// 客户端渲染参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct QrOptions {
    #[serde(default)]
    pub error_correction: ErrorCorrection,
    #[serde(default = "default_margin")]
    pub margin: u32,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_dark")]
    pub dark: String,
    #[serde(default = "default_light")]
    pub light: String,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            error_correction: ErrorCorrection::default(),
            margin: default_margin(),
            width: default_width(),
            dark: default_dark(),
            light: default_light(),
        }
    }
}

impl QrOptions {
    pub fn validate(&self) -> Result<()> {
        if !(64..=2048).contains(&self.width) {
            return Err(CardshareError::validation("width must be between 64 and 2048"));
        }
        if self.margin > 16 {
            return Err(CardshareError::validation("margin must be between 0 and 16"));
        }
        for (name, color) in [("dark", &self.dark), ("light", &self.light)] {
            if !is_hex_color(color) {
                return Err(CardshareError::validation(format!(
                    "{}: expected #RRGGBB, got {}",
                    name, color
                )));
            }
        }
        Ok(())
    }
}

fn default_wifi_auth() -> String {
    "WPA".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct WifiInput {
    pub ssid: String,
    #[serde(default)]
    pub password: String,
    /// WPA / WEP / nopass
    #[serde(default = "default_wifi_auth")]
    pub auth: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct EventInput {
    pub summary: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// 生成请求；`card_id` 存在时 url / vcard 模板可以省略 data
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct QrRequest {
    #[serde(default)]
    pub template: QrTemplate,
    pub data: Option<String>,
    pub wifi: Option<WifiInput>,
    pub event: Option<EventInput>,
    pub card_id: Option<String>,
    pub options: Option<QrOptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct QrPayload {
    pub template: QrTemplate,
    pub payload: String,
    pub options: QrOptions,
}

/// 卡片相关的默认内容
#[derive(Debug, Clone, Default)]
pub struct CardContext {
    pub card_url: String,
    pub vcard: String,
}

/// WIFI 字段转义：`\ ; , : "`
fn escape_wifi(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | ';' | ',' | ':' | '"') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn with_prefix(prefix: &str, value: &str) -> String {
    if value.to_ascii_lowercase().starts_with(prefix) {
        value.to_string()
    } else {
        format!("{}{}", prefix, value)
    }
}

fn required<'a>(data: Option<&'a str>, template: QrTemplate) -> Result<&'a str> {
    data.map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| {
            CardshareError::validation(format!("data is required for the {:?} template", template))
        })
}

/// 生成二维码要编码的字符串
pub fn build_qr_payload(req: &QrRequest, card: Option<&CardContext>) -> Result<String> {
    let data = req.data.as_deref().map(str::trim).filter(|d| !d.is_empty());

    match req.template {
        QrTemplate::Url => match (data, card) {
            (Some(url), _) => Ok(url.to_string()),
            (None, Some(card)) => Ok(card.card_url.clone()),
            (None, None) => Err(CardshareError::validation("data is required for the Url template")),
        },
        QrTemplate::Email | QrTemplate::Phone | QrTemplate::Sms | QrTemplate::Location => {
            let value = required(data, req.template)?;
            let prefix = req.template.prefix().unwrap_or_default();
            Ok(with_prefix(prefix, value))
        }
        QrTemplate::Wifi => {
            let wifi = req
                .wifi
                .as_ref()
                .filter(|w| !w.ssid.trim().is_empty())
                .ok_or_else(|| CardshareError::validation("wifi.ssid is required"))?;
            let auth = if wifi.auth.trim().is_empty() {
                default_wifi_auth()
            } else {
                wifi.auth.trim().to_string()
            };
            Ok(format!(
                "WIFI:T:{};S:{};P:{};;",
                escape_wifi(&auth),
                escape_wifi(wifi.ssid.trim()),
                escape_wifi(&wifi.password)
            ))
        }
        QrTemplate::Vcard => match (data, card) {
            (Some(raw), _) if raw.to_ascii_uppercase().starts_with("BEGIN:VCARD") => {
                Ok(raw.to_string())
            }
            (_, Some(card)) => Ok(card.vcard.clone()),
            _ => Err(CardshareError::validation(
                "card_id is required for the Vcard template",
            )),
        },
        QrTemplate::Event => {
            let event = req
                .event
                .as_ref()
                .filter(|e| !e.summary.trim().is_empty())
                .ok_or_else(|| CardshareError::validation("event.summary is required"))?;

            let mut lines = vec![
                "BEGIN:VEVENT".to_string(),
                format!("SUMMARY:{}", event.summary.trim()),
            ];
            let optional = [
                ("DTSTART", &event.start),
                ("DTEND", &event.end),
                ("LOCATION", &event.location),
            ];
            for (name, value) in optional {
                if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                    lines.push(format!("{}:{}", name, v));
                }
            }
            lines.push("END:VEVENT".to_string());
            Ok(lines.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(template: QrTemplate, data: &str) -> QrRequest {
        QrRequest {
            template,
            data: Some(data.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_prefix_not_duplicated() {
        assert_eq!(
            build_qr_payload(&req(QrTemplate::Email, "a@b.c"), None).unwrap(),
            "mailto:a@b.c"
        );
        assert_eq!(
            build_qr_payload(&req(QrTemplate::Email, "mailto:a@b.c"), None).unwrap(),
            "mailto:a@b.c"
        );
        assert_eq!(
            build_qr_payload(&req(QrTemplate::Location, "51.5,-0.1"), None).unwrap(),
            "geo:51.5,-0.1"
        );
    }

    #[test]
    fn test_url_falls_back_to_card() {
        let card = CardContext {
            card_url: "http://localhost:8080/card/card_1".into(),
            vcard: "BEGIN:VCARD\nEND:VCARD".into(),
        };
        let empty = QrRequest::default();
        assert_eq!(
            build_qr_payload(&empty, Some(&card)).unwrap(),
            card.card_url
        );
        assert!(build_qr_payload(&empty, None).is_err());
    }

    #[test]
    fn test_wifi_escaping() {
        let r = QrRequest {
            template: QrTemplate::Wifi,
            wifi: Some(WifiInput {
                ssid: "Cafe;Net".into(),
                password: "p:w,d".into(),
                auth: "WPA".into(),
            }),
            ..Default::default()
        };
        assert_eq!(
            build_qr_payload(&r, None).unwrap(),
            "WIFI:T:WPA;S:Cafe\\;Net;P:p\\:w\\,d;;"
        );
    }

    #[test]
    fn test_event_payload() {
        let r = QrRequest {
            template: QrTemplate::Event,
            event: Some(EventInput {
                summary: "Launch".into(),
                start: Some("20260101T090000Z".into()),
                end: None,
                location: Some("HQ".into()),
            }),
            ..Default::default()
        };
        assert_eq!(
            build_qr_payload(&r, None).unwrap(),
            "BEGIN:VEVENT\nSUMMARY:Launch\nDTSTART:20260101T090000Z\nLOCATION:HQ\nEND:VEVENT"
        );
    }

    #[test]
    fn test_options_validation() {
        assert!(QrOptions::default().validate().is_ok());
        let too_small = QrOptions {
            width: 32,
            ..Default::default()
        };
        assert!(too_small.validate().is_err());
        let bad_color = QrOptions {
            dark: "black".into(),
            ..Default::default()
        };
        assert!(bad_color.validate().is_err());
    }
}
