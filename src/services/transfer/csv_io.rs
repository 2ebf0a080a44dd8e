//! CSV 导入导出
//!
//! 表头按子串模糊匹配，字段支持引号、内嵌逗号和换行。

use std::collections::HashMap;

use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};

use super::{ImportedContact, ParsedRow, clean, split_tags};
use crate::errors::{CardshareError, Result};
use crate::storage::Contact;

pub const EXPORT_HEADER: [&str; 10] = [
    "Name",
    "Email",
    "Phone",
    "Company",
    "Job Title",
    "Website",
    "Notes",
    "Tags",
    "Source",
    "Created",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Field {
    FullName,
    FirstName,
    LastName,
    Email,
    Phone,
    Company,
    JobTitle,
    Website,
    Notes,
    Tags,
}

/// 表头归类，按规则顺序取第一个命中的
fn classify_header(raw: &str) -> Option<Field> {
    let h = raw.trim().trim_matches('"').trim().to_lowercase();
    let has = |needle: &str| h.contains(needle);

    if has("name") && !has("first") && !has("last") {
        Some(Field::FullName)
    } else if has("first") && has("name") {
        Some(Field::FirstName)
    } else if has("last") && has("name") {
        Some(Field::LastName)
    } else if has("email") {
        Some(Field::Email)
    } else if has("phone") {
        Some(Field::Phone)
    } else if has("company") || has("organization") {
        Some(Field::Company)
    } else if has("title") || has("job") {
        Some(Field::JobTitle)
    } else if has("website") || has("url") {
        Some(Field::Website)
    } else if has("note") || has("bio") {
        Some(Field::Notes)
    } else if has("tag") {
        Some(Field::Tags)
    } else {
        None
    }
}

/// 字段 -> 列下标（同类多列时取第一列）
struct ColumnMap(HashMap<Field, usize>);

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut map = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(field) = classify_header(header) {
                map.entry(field).or_insert(idx);
            }
        }
        Self(map)
    }

    fn get<'r>(&self, record: &'r StringRecord, field: Field) -> &'r str {
        self.0
            .get(&field)
            .and_then(|idx| record.get(*idx))
            .unwrap_or("")
    }

    fn value(&self, record: &StringRecord, field: Field) -> Option<String> {
        clean(self.get(record, field))
    }

    fn resolve_name(&self, record: &StringRecord) -> Option<String> {
        self.value(record, Field::FullName).or_else(|| {
            let first = self.get(record, Field::FirstName).trim();
            let last = self.get(record, Field::LastName).trim();
            clean(&format!("{} {}", first, last))
        })
    }
}

fn is_blank_line(record: &StringRecord) -> bool {
    record.iter().all(|f| f.trim().is_empty()) && record.len() <= 1
}

/// 解析 CSV，返回每一数据行的结果
///
/// 行号 = 数据行下标 + 2（即表头之后的 1 基行号），空行跳过不计数。
pub fn parse_csv(text: &str) -> Result<Vec<ParsedRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| CardshareError::import_parse(format!("Invalid CSV header: {}", e)))?
        .clone();
    let columns = ColumnMap::from_headers(&headers);

    let mut rows = Vec::new();
    let mut data_index = 0usize;

    for result in reader.records() {
        let row_number = data_index + 2;
        match result {
            Ok(record) if is_blank_line(&record) => continue,
            Ok(record) => {
                rows.push(match columns.resolve_name(&record) {
                    Some(full_name) => Ok(ImportedContact {
                        full_name,
                        email: columns.value(&record, Field::Email),
                        phone: columns.value(&record, Field::Phone),
                        company: columns.value(&record, Field::Company),
                        job_title: columns.value(&record, Field::JobTitle),
                        website: columns.value(&record, Field::Website),
                        notes: columns.value(&record, Field::Notes),
                        tags: split_tags(columns.get(&record, Field::Tags), &[';']),
                    }),
                    None => Err(format!("Row {}: Missing name", row_number)),
                });
            }
            Err(e) => rows.push(Err(format!("Row {}: {}", row_number, e))),
        }
        data_index += 1;
    }

    Ok(rows)
}

/// 导出 CSV，所有字段加双引号
pub fn export_csv(contacts: &[Contact]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let export_err = |e: csv::Error| CardshareError::export_failed(format!("CSV write failed: {}", e));

    writer.write_record(EXPORT_HEADER).map_err(export_err)?;

    for c in contacts {
        let tags = c.tags.join(";");
        let created = c.created_at.to_rfc3339();
        writer
            .write_record([
                c.full_name.as_str(),
                c.email.as_deref().unwrap_or(""),
                c.phone.as_deref().unwrap_or(""),
                c.company.as_deref().unwrap_or(""),
                c.job_title.as_deref().unwrap_or(""),
                c.website.as_deref().unwrap_or(""),
                c.notes.as_deref().unwrap_or(""),
                tags.as_str(),
                c.source_type.as_ref(),
                created.as_str(),
            ])
            .map_err(export_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CardshareError::export_failed(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| CardshareError::export_failed(format!("CSV is not valid UTF-8: {}", e)))
}
