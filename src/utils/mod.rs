pub mod time_window;
pub mod url_validator;

use chrono::Utc;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 生成带前缀的实体 ID：`{prefix}_{unix_millis}_{9 位 base36}`
pub fn generate_id(prefix: &str) -> String {
    let suffix: String = std::iter::repeat_with(|| BASE36[rand::random_range(0..BASE36.len())] as char)
        .take(9)
        .collect();
    format!("{}_{}_{}", prefix, Utc::now().timestamp_millis(), suffix)
}

/// 去除首尾空白，空串视为 None
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 是否为 `#RRGGBB` 颜色
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// HTML 转义
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// 生成文件名用的 slug（小写字母数字，其余折叠为 `-`）
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_dash = true;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "card".to_string()
    } else {
        slug
    }
}

/// 布尔字段的宽松反序列化：接受 true/false、"1"/"0"、"true"/"false"、1/0
pub mod flag {
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Str(String),
    }

    fn convert<E: Error>(raw: Raw) -> Result<bool, E> {
        match raw {
            Raw::Bool(b) => Ok(b),
            Raw::Int(0) => Ok(false),
            Raw::Int(1) => Ok(true),
            Raw::Int(n) => Err(E::custom(format!("invalid flag value: {}", n))),
            Raw::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => Ok(true),
                "0" | "false" => Ok(false),
                other => Err(E::custom(format!("invalid flag value: {}", other))),
            },
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        convert(Raw::deserialize(deserializer)?)
    }

    /// `Option<bool>` 版本，需配合 `#[serde(default)]` 使用
    pub mod option {
        use super::*;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<Raw>::deserialize(deserializer)? {
                Some(raw) => convert(raw).map(Some),
                None => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_generate_id_format() {
        let id = generate_id("card");
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "card");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_generate_id_unique() {
        let a = generate_id("contact");
        let b = generate_id("contact");
        assert_ne!(a, b);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some(" a ".to_string())), Some("a".to_string()));
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_is_hex_color() {
        assert!(is_hex_color("#2563EB"));
        assert!(is_hex_color("#ffffff"));
        assert!(!is_hex_color("2563EB"));
        assert!(!is_hex_color("#2563E"));
        assert!(!is_hex_color("#GGGGGG"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>Tom & \"Jerry\"</b>"),
            "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Jane Q. Doe"), "jane-q-doe");
        assert_eq!(slugify("  "), "card");
    }

    #[derive(Deserialize)]
    struct Flags {
        #[serde(deserialize_with = "flag::deserialize")]
        a: bool,
        #[serde(default, deserialize_with = "flag::option::deserialize")]
        b: Option<bool>,
    }

    #[test]
    fn test_flag_accepts_legacy_strings() {
        let f: Flags = serde_json::from_str(r#"{"a":"1","b":"0"}"#).unwrap();
        assert!(f.a);
        assert_eq!(f.b, Some(false));

        let f: Flags = serde_json::from_str(r#"{"a":false}"#).unwrap();
        assert!(!f.a);
        assert_eq!(f.b, None);

        assert!(serde_json::from_str::<Flags>(r#"{"a":"yes"}"#).is_err());
    }
}
