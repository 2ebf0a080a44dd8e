//! JSON 导入导出

use serde::Serialize;
use serde_json::Value;

use super::{ImportedContact, ParsedRow, clean, split_tags};
use crate::errors::{CardshareError, Result};
use crate::storage::Contact;

/// 导出格式，缺失的可选字段输出空串
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedContact<'a> {
    full_name: &'a str,
    email: &'a str,
    phone: &'a str,
    company: &'a str,
    job_title: &'a str,
    website: &'a str,
    notes: &'a str,
    source_type: &'a str,
    tags: &'a [String],
    created_at: String,
}

fn str_field(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .filter_map(Value::as_str)
        .find_map(clean)
}

fn tags_field(obj: &serde_json::Map<String, Value>) -> Vec<String> {
    match obj.get("tags") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(clean)
            .collect(),
        Some(Value::String(raw)) => split_tags(raw, &[';', ',']),
        _ => Vec::new(),
    }
}

fn resolve_name(obj: &serde_json::Map<String, Value>) -> Option<String> {
    str_field(obj, &["name", "fullName"]).or_else(|| {
        let first = str_field(obj, &["firstName"]).unwrap_or_default();
        let last = str_field(obj, &["lastName"]).unwrap_or_default();
        clean(&format!("{} {}", first, last))
    })
}

/// 解析 JSON 数组，元素序号从 1 开始
pub fn parse_json(text: &str) -> Result<Vec<ParsedRow>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| CardshareError::import_parse(format!("Invalid JSON: {}", e)))?;

    let Value::Array(items) = value else {
        return Err(CardshareError::import_parse(
            "JSON import expects an array of contacts",
        ));
    };

    Ok(items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let n = idx + 1;
            let obj = item
                .as_object()
                .ok_or_else(|| format!("Item {}: Expected an object", n))?;
            let full_name = resolve_name(obj).ok_or_else(|| format!("Item {}: Missing name", n))?;

            Ok(ImportedContact {
                full_name,
                email: str_field(obj, &["email"]),
                phone: str_field(obj, &["phone", "phoneNumber"]),
                company: str_field(obj, &["company", "organization"]),
                job_title: str_field(obj, &["jobTitle", "title"]),
                website: str_field(obj, &["website", "url"]),
                notes: str_field(obj, &["notes", "bio"]),
                tags: tags_field(obj),
            })
        })
        .collect())
}

/// 导出为格式化的 JSON 数组
pub fn export_json(contacts: &[Contact]) -> Result<String> {
    let rows: Vec<ExportedContact<'_>> = contacts
        .iter()
        .map(|c| ExportedContact {
            full_name: &c.full_name,
            email: c.email.as_deref().unwrap_or(""),
            phone: c.phone.as_deref().unwrap_or(""),
            company: c.company.as_deref().unwrap_or(""),
            job_title: c.job_title.as_deref().unwrap_or(""),
            website: c.website.as_deref().unwrap_or(""),
            notes: c.notes.as_deref().unwrap_or(""),
            source_type: c.source_type.as_ref(),
            tags: &c.tags,
            created_at: c.created_at.to_rfc3339(),
        })
        .collect();

    serde_json::to_string_pretty(&rows)
        .map_err(|e| CardshareError::export_failed(format!("JSON export failed: {}", e)))
}
