//! NFC 标签写入内容（NDEF）

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::api::constants::TS_EXPORT_PATH;
use crate::storage::NfcTag;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct NdefRecord {
    pub record_type: String,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// url 记录 + text 记录
pub fn ndef_message(tag: &NfcTag) -> Vec<NdefRecord> {
    vec![
        NdefRecord {
            record_type: "url".to_string(),
            data: tag.card_url.clone(),
            lang: None,
        },
        NdefRecord {
            record_type: "text".to_string(),
            data: format!("{} - Digital Business Card", tag.card_title),
            lang: Some("en".to_string()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_ndef_records() {
        let tag = NfcTag {
            id: "nfc_1".into(),
            user_id: "user_1".into(),
            card_id: "card_1".into(),
            name: "Desk".into(),
            card_title: "Ada Lovelace".into(),
            card_url: "http://localhost:8080/card/card_1".into(),
            is_active: true,
            write_count: 0,
            last_used: None,
            created_at: Utc::now(),
        };
        let records = ndef_message(&tag);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].record_type, "url");
        assert_eq!(records[0].data, tag.card_url);
        assert_eq!(records[1].data, "Ada Lovelace - Digital Business Card");
        assert_eq!(records[1].lang.as_deref(), Some("en"));
    }
}
