//! vCard 3.0 读写

use super::{ImportedContact, ParsedRow, clean};
use crate::storage::Contact;

/// 待输出的一张 vCard
#[derive(Debug, Clone, Default)]
pub struct VCard {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    /// (TYPE 参数, 链接)
    pub urls: Vec<(Option<&'static str>, String)>,
    pub note: Option<String>,
}

impl VCard {
    pub fn render(&self) -> String {
        let mut lines = vec![
            "BEGIN:VCARD".to_string(),
            "VERSION:3.0".to_string(),
            format!("FN:{}", escape_value(&self.full_name)),
        ];

        let mut push = |name: &str, value: Option<&str>| {
            if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
                lines.push(format!("{}:{}", name, escape_value(v)));
            }
        };
        push("EMAIL", self.email.as_deref());
        push("TEL", self.phone.as_deref());
        push("ORG", self.company.as_deref());
        push("TITLE", self.job_title.as_deref());
        for (kind, url) in &self.urls {
            match kind {
                Some(kind) => push(&format!("URL;TYPE={}", kind), Some(url)),
                None => push("URL", Some(url)),
            }
        }
        push("NOTE", self.note.as_deref());

        lines.push("END:VCARD".to_string());
        lines.join("\n")
    }
}

impl From<&Contact> for VCard {
    fn from(c: &Contact) -> Self {
        VCard {
            full_name: c.full_name.clone(),
            email: c.email.clone(),
            phone: c.phone.clone(),
            company: c.company.clone(),
            job_title: c.job_title.clone(),
            urls: c.website.iter().map(|w| (None, w.clone())).collect(),
            note: c.notes.clone(),
        }
    }
}

pub fn escape_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace(';', "\\;")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
}

pub fn unescape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// 续行（以空格或制表符开头）拼回上一行
fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.lines() {
        if (raw.starts_with(' ') || raw.starts_with('\t'))
            && let Some(last) = lines.last_mut()
        {
            last.push_str(&raw[1..]);
        } else {
            lines.push(raw.to_string());
        }
    }
    lines
}

/// 属性名：去掉参数和分组前缀，大写
fn property_name(name_part: &str) -> String {
    let base = name_part.split(';').next().unwrap_or("");
    let base = base.rsplit('.').next().unwrap_or(base);
    base.trim().to_ascii_uppercase()
}

fn parse_block(lines: &[String], n: usize) -> ParsedRow {
    let mut contact = ImportedContact::default();
    let mut full_name: Option<String> = None;
    let mut structured_name: Option<String> = None;

    for line in lines {
        let Some((name_part, raw_value)) = line.split_once(':') else {
            continue;
        };

        let slot = match property_name(name_part).as_str() {
            "FN" => &mut full_name,
            "N" => {
                if structured_name.is_none() {
                    let parts: Vec<String> = raw_value.split(';').map(unescape_value).collect();
                    let family = parts.first().map(|s| s.trim()).unwrap_or("");
                    let given = parts.get(1).map(|s| s.trim()).unwrap_or("");
                    structured_name = clean(&format!("{} {}", given, family));
                }
                continue;
            }
            "EMAIL" => &mut contact.email,
            "TEL" => &mut contact.phone,
            "ORG" => &mut contact.company,
            "TITLE" => &mut contact.job_title,
            "URL" => &mut contact.website,
            "NOTE" => &mut contact.notes,
            _ => continue,
        };

        if slot.is_none() {
            let value = if property_name(name_part) == "ORG" {
                // ORG 的组织单元以分号分隔，只取第一段
                unescape_value(raw_value.split(';').next().unwrap_or(""))
            } else {
                unescape_value(raw_value)
            };
            *slot = clean(&value);
        }
    }

    match full_name.or(structured_name) {
        Some(name) => {
            contact.full_name = name;
            Ok(contact)
        }
        None => Err(format!("vCard {}: Missing name", n)),
    }
}

/// 解析一份或多份 vCard，序号从 1 开始
pub fn parse_vcard(text: &str) -> Vec<ParsedRow> {
    let mut blocks: Vec<Vec<String>> = Vec::new();
    let mut open = false;

    for line in unfold(text) {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("BEGIN:VCARD") {
            blocks.push(Vec::new());
            open = true;
        } else if trimmed.eq_ignore_ascii_case("END:VCARD") {
            open = false;
        } else if open && let Some(block) = blocks.last_mut() {
            block.push(trimmed.to_string());
        }
    }

    blocks
        .iter()
        .enumerate()
        .map(|(idx, block)| parse_block(block, idx + 1))
        .collect()
}

/// 导出为多张 vCard，空行分隔
pub fn export_vcard(contacts: &[Contact]) -> String {
    contacts
        .iter()
        .map(|c| VCard::from(c).render())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_blocks_become_two_contacts() {
        let text = "BEGIN:VCARD\nVERSION:3.0\nFN:Ada Lovelace\nEMAIL;TYPE=INTERNET:ada@x.org\nEND:VCARD\n\
                    BEGIN:VCARD\nVERSION:3.0\nFN:Charles Babbage\nTEL;TYPE=CELL:+44 1\nORG:Engines Ltd;R&D\nEND:VCARD\n";
        let rows = parse_vcard(text);
        assert_eq!(rows.len(), 2);

        let ada = rows[0].as_ref().unwrap();
        assert_eq!(ada.full_name, "Ada Lovelace");
        assert_eq!(ada.email.as_deref(), Some("ada@x.org"));

        let charles = rows[1].as_ref().unwrap();
        assert_eq!(charles.phone.as_deref(), Some("+44 1"));
        assert_eq!(charles.company.as_deref(), Some("Engines Ltd"));
    }

    #[test]
    fn test_folded_lines_and_escapes() {
        let text = "BEGIN:VCARD\r\nFN:Doe\\, Jane\r\nNOTE:first line\\nsecond \r\n line\\; done\r\nEND:VCARD\r\n";
        let c = parse_vcard(text).remove(0).unwrap();
        assert_eq!(c.full_name, "Doe, Jane");
        assert_eq!(c.notes.as_deref(), Some("first line\nsecond line; done"));
    }

    #[test]
    fn test_structured_name_fallback() {
        let text = "BEGIN:VCARD\nN:Hopper;Grace;;;\nEND:VCARD\nBEGIN:VCARD\nEMAIL:nobody@x.org\nEND:VCARD";
        let rows = parse_vcard(text);
        assert_eq!(rows[0].as_ref().unwrap().full_name, "Grace Hopper");
        assert_eq!(rows[1].as_ref().unwrap_err(), "vCard 2: Missing name");
    }

    #[test]
    fn test_grouped_property_names() {
        let text = "BEGIN:VCARD\nFN:Grouped\nitem1.URL:https://example.com\nEND:VCARD";
        let c = parse_vcard(text).remove(0).unwrap();
        assert_eq!(c.website.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_render_skips_empty_fields() {
        let card = VCard {
            full_name: "Ada".to_string(),
            email: Some("ada@x.org".to_string()),
            phone: Some("  ".to_string()),
            urls: vec![(Some("linkedin"), "https://linkedin.com/in/ada".to_string())],
            ..Default::default()
        };
        let rendered = card.render();
        assert!(rendered.starts_with("BEGIN:VCARD\nVERSION:3.0\nFN:Ada\n"));
        assert!(rendered.contains("EMAIL:ada@x.org"));
        assert!(!rendered.contains("TEL:"));
        assert!(rendered.contains("URL;TYPE=linkedin:https://linkedin.com/in/ada"));
        assert!(rendered.ends_with("END:VCARD"));
    }

    #[test]
    fn test_escape_unescape() {
        let raw = "a,b;c\\d\ne";
        assert_eq!(escape_value(raw), "a\\,b\\;c\\\\d\\ne");
        assert_eq!(unescape_value(&escape_value(raw)), raw);
    }
}
