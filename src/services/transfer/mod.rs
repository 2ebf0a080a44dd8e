//! 联系人导入导出
//!
//! 三种格式（CSV / JSON / vCard）都先解析为 [`ImportedContact`]，
//! 每一行独立成功或失败，失败信息带行号。

mod csv_io;
mod json_io;
pub mod vcard;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::api::constants::TS_EXPORT_PATH;
use crate::errors::{CardshareError, Result};
use crate::storage::Contact;

pub use csv_io::{export_csv, parse_csv};
pub use json_io::{export_json, parse_json};
pub use vcard::{export_vcard, parse_vcard};

/// 导入导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "lowercase")]
pub enum TransferFormat {
    #[default]
    Csv,
    Json,
    #[serde(alias = "vcf")]
    Vcard,
}

impl TransferFormat {
    pub fn extension(self) -> &'static str {
        match self {
            TransferFormat::Csv => "csv",
            TransferFormat::Json => "json",
            TransferFormat::Vcard => "vcf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            TransferFormat::Csv => "text/csv; charset=utf-8",
            TransferFormat::Json => "application/json",
            TransferFormat::Vcard => "text/vcard; charset=utf-8",
        }
    }

    /// 从文件名后缀推断格式，无法识别时返回 None
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = filename.rsplit_once('.')?.1;
        ext.parse().ok()
    }
}

impl FromStr for TransferFormat {
    type Err = CardshareError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(TransferFormat::Csv),
            "json" => Ok(TransferFormat::Json),
            "vcard" | "vcf" => Ok(TransferFormat::Vcard),
            other => Err(CardshareError::validation(format!(
                "Unsupported format: {}. Expected csv, json or vcard",
                other
            ))),
        }
    }
}

impl std::fmt::Display for TransferFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransferFormat::Csv => "csv",
            TransferFormat::Json => "json",
            TransferFormat::Vcard => "vcard",
        };
        f.write_str(name)
    }
}

/// 解析后的联系人（未落库）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedContact {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

/// 单行解析结果，失败时为带行号的错误描述
pub type ParsedRow = std::result::Result<ImportedContact, String>;

/// 导入结果中最多展示的错误条数
pub const IMPORT_ERROR_DISPLAY_LIMIT: usize = 5;

/// 导入统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ImportReport {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn record_success(&mut self) {
        self.total += 1;
        self.success += 1;
    }

    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.total += 1;
        self.failed += 1;
        self.errors.push(error.into());
    }

    /// 展示给用户的错误列表：前 5 条加折叠行
    pub fn display_errors(&self) -> Vec<String> {
        self.summary_errors(IMPORT_ERROR_DISPLAY_LIMIT)
    }

    /// 前 `limit` 条错误，超出部分折叠为一行
    pub fn summary_errors(&self, limit: usize) -> Vec<String> {
        let mut summary: Vec<String> = self.errors.iter().take(limit).cloned().collect();
        if self.errors.len() > limit {
            summary.push(format!("... and {} more errors", self.errors.len() - limit));
        }
        summary
    }
}

/// 导出的文件
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub body: String,
}

/// `contacts-YYYY-MM-DD.ext`
pub fn export_filename(format: TransferFormat, now: DateTime<Utc>) -> String {
    format!(
        "contacts-{}.{}",
        now.format("%Y-%m-%d"),
        format.extension()
    )
}

/// 按格式解析整份文本
pub fn parse_contacts(format: TransferFormat, text: &str) -> Result<Vec<ParsedRow>> {
    match format {
        TransferFormat::Csv => parse_csv(text),
        TransferFormat::Json => parse_json(text),
        TransferFormat::Vcard => Ok(parse_vcard(text)),
    }
}

/// 按格式导出联系人
pub fn export_contacts(format: TransferFormat, contacts: &[Contact]) -> Result<ExportFile> {
    let body = match format {
        TransferFormat::Csv => export_csv(contacts)?,
        TransferFormat::Json => export_json(contacts)?,
        TransferFormat::Vcard => export_vcard(contacts),
    };

    Ok(ExportFile {
        filename: export_filename(format, Utc::now()),
        content_type: format.content_type(),
        body,
    })
}

/// 去空白，空串为 None
pub(crate) fn clean(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// 标签分隔：按给定分隔符切分、去空白、丢弃空项
pub(crate) fn split_tags(raw: &str, separators: &[char]) -> Vec<String> {
    raw.split(|c| separators.contains(&c))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
