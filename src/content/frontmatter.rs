//! Front-matter parsing

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;

use super::ContentError;

/// Line that opens and closes the metadata block
const MARKER: &str = "---";

/// Fields whose values are coerced to dates
const DATE_FIELDS: &[&str] = &["publishedAt"];

/// A scalar front-matter value after type coercion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Bool(bool),
    Date(DateTime<FixedOffset>),
}

impl FieldValue {
    /// Borrow the value as a string, if it is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::String(s) => s.parse().ok(),
            FieldValue::Date(_) => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            FieldValue::Date(d) => Some(d),
            _ => None,
        }
    }

    /// Display form of any value; dates use RFC 3339
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::String(s) => s.clone(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Date(d) => d.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }

    fn to_yaml(&self) -> Value {
        match self {
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Date(_) => Value::String(self.to_text()),
        }
    }
}

/// Front-matter fields of a document, in the order they were written
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FrontMatter {
    fields: IndexMap<String, FieldValue>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), ContentError> {
        let content = content.trim_start_matches('\u{feff}');
        let content = content.trim_start_matches(['\n', '\r']);

        let (first, mut rest) = split_line(content);
        if first.trim_end() != MARKER {
            return Err(ContentError::malformed(
                "missing opening `---` front-matter marker",
            ));
        }

        let block_start = rest;
        let mut block_len = 0;
        loop {
            if rest.is_empty() {
                return Err(ContentError::malformed(
                    "unterminated front-matter block",
                ));
            }
            let (line, next) = split_line(rest);
            if line.trim_end() == MARKER {
                let body = next.trim_start_matches(['\n', '\r']);
                let fm = Self::from_yaml(&block_start[..block_len])?;
                return Ok((fm, body));
            }
            block_len += rest.len() - next.len();
            rest = next;
        }
    }

    fn from_yaml(yaml: &str) -> Result<Self, ContentError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_yaml::from_str(yaml).map_err(|e| {
            ContentError::malformed(format!("invalid YAML front-matter: {}", e))
        })?;
        let mapping = match value {
            Value::Mapping(m) => m,
            Value::Null => return Ok(Self::default()),
            _ => {
                return Err(ContentError::malformed(
                    "front-matter is not a key/value mapping",
                ))
            }
        };

        let mut fm = Self::default();
        for (key, value) in mapping {
            let key = match scalar_text(&key) {
                Some(k) => k,
                None => {
                    return Err(ContentError::malformed(
                        "front-matter keys must be scalars",
                    ))
                }
            };
            if let Some(value) = coerce(&key, value)? {
                fm.fields.insert(key, value);
            }
        }
        Ok(fm)
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Get a field as text, whatever its type
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.fields.get(key).map(FieldValue::to_text)
    }

    /// Set a field, coercing date fields the same way parsing does
    pub fn insert(&mut self, key: &str, value: FieldValue) -> Result<(), ContentError> {
        let value = match value {
            FieldValue::String(s) if DATE_FIELDS.contains(&key) => {
                FieldValue::Date(parse_date(key, &s)?)
            }
            other => other,
        };
        self.fields.insert(key.to_string(), value);
        Ok(())
    }

    /// Set an already-typed field as is
    pub(crate) fn set(&mut self, key: &str, value: FieldValue) {
        self.fields.insert(key.to_string(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    /// Serialize back to a `---` delimited block
    pub fn render(&self) -> String {
        let mut out = String::from("---\n");
        if !self.fields.is_empty() {
            let mapping: serde_yaml::Mapping = self
                .fields
                .iter()
                .map(|(k, v)| (Value::String(k.clone()), v.to_yaml()))
                .collect();
            // Serializing a mapping of scalars cannot fail
            let yaml = serde_yaml::to_string(&mapping).unwrap_or_default();
            out.push_str(&yaml);
            if !yaml.ends_with('\n') {
                out.push('\n');
            }
        }
        out.push_str("---\n");
        out
    }
}

/// Split off the first line, returning (line without newline, rest)
fn split_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(pos) => (s[..pos].trim_end_matches('\r'), &s[pos + 1..]),
        None => (s, ""),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce a YAML value into a field value; `None` means absent
fn coerce(key: &str, value: Value) -> Result<Option<FieldValue>, ContentError> {
    let value = match value {
        Value::Tagged(tagged) => tagged.value,
        other => other,
    };

    if DATE_FIELDS.contains(&key) {
        return match scalar_text(&value) {
            Some(text) => Ok(Some(FieldValue::Date(parse_date(key, &text)?))),
            None if value.is_null() => Ok(None),
            None => Err(ContentError::InvalidDateFormat {
                path: None,
                field: key.to_string(),
                value: serde_yaml::to_string(&value)
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
            }),
        };
    }

    Ok(match value {
        Value::Null => None,
        Value::Bool(b) => Some(FieldValue::Bool(b)),
        Value::String(s) => Some(FieldValue::String(s)),
        Value::Number(n) => Some(FieldValue::String(n.to_string())),
        other => Some(FieldValue::String(
            serde_yaml::to_string(&other)
                .unwrap_or_default()
                .trim_end()
                .to_string(),
        )),
    })
}

fn parse_date(field: &str, s: &str) -> Result<DateTime<FixedOffset>, ContentError> {
    parse_date_string(s).ok_or_else(|| ContentError::InvalidDateFormat {
        path: None,
        field: field.to_string(),
        value: s.to_string(),
    })
}

/// Parse a date string in various formats; offset-less forms are UTC
pub fn parse_date_string(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }

    let offset_formats = ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"];
    for fmt in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().fixed_offset());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            let dt = d.and_hms_opt(0, 0, 0)?;
            return Some(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc).fixed_offset());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: "Hello World"
publishedAt: "2024-01-15"
summary: A first post
category: Rust
banner: /images/hello.png
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.get_text("title").as_deref(), Some("Hello World"));
        assert_eq!(fm.get_text("category").as_deref(), Some("Rust"));
        let date = fm.get("publishedAt").and_then(FieldValue::as_date).unwrap();
        assert_eq!(date.format("%Y-%m-%d").to_string(), "2024-01-15");
        assert_eq!(body, "This is the content.\n");
    }

    #[test]
    fn test_missing_opening_marker() {
        let err = FrontMatter::parse("title: Hello\n---\nbody").unwrap_err();
        assert_eq!(err.kind(), "MalformedDocument");
    }

    #[test]
    fn test_unterminated_block() {
        let err = FrontMatter::parse("---\ntitle: Hello\npublishedAt: 2024-01-01\n").unwrap_err();
        assert_eq!(err.kind(), "MalformedDocument");
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn test_invalid_yaml_is_malformed() {
        let err = FrontMatter::parse("---\ntitle: [unclosed\n---\n").unwrap_err();
        assert_eq!(err.kind(), "MalformedDocument");
    }

    #[test]
    fn test_invalid_date() {
        let err = FrontMatter::parse("---\ntitle: A\npublishedAt: last tuesday\n---\n").unwrap_err();
        match err {
            ContentError::InvalidDateFormat { field, value, .. } => {
                assert_eq!(field, "publishedAt");
                assert_eq!(value, "last tuesday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_scalar_coercion() {
        let content = r#"---
title: 2024
draft: true
views: 42
stack:
  - rust
  - axum
empty:
---
"#;
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.get("title"), Some(&FieldValue::String("2024".into())));
        assert_eq!(fm.get("draft"), Some(&FieldValue::Bool(true)));
        assert_eq!(fm.get("views"), Some(&FieldValue::String("42".into())));
        assert_eq!(
            fm.get("stack"),
            Some(&FieldValue::String("- rust\n- axum".into()))
        );
        assert_eq!(fm.get("empty"), None);
        assert!(body.is_empty());
    }

    #[test]
    fn test_crlf_and_bom() {
        let content = "\u{feff}---\r\ntitle: Windows\r\npublishedAt: 2023-05-01 08:00\r\n---\r\nBody\r\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.get_text("title").as_deref(), Some("Windows"));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_marker_inside_body_is_kept() {
        let content = "---\ntitle: A\n---\nintro\n---\nmore\n";
        let (_, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(body, "intro\n---\nmore\n");
    }

    #[test]
    fn test_render_round_trip() {
        let content = r#"---
title: "Colons: they work"
publishedAt: 2024-03-09T18:45:00+08:00
summary: Notes on parsing
category: ""
draft: false
---
Body
"#;
        let (fm, _) = FrontMatter::parse(content).unwrap();
        let rendered = fm.render();
        let (reparsed, rest) = FrontMatter::parse(&rendered).unwrap();
        assert_eq!(reparsed, fm);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_insert_coerces_dates() {
        let mut fm = FrontMatter::default();
        fm.insert("publishedAt", FieldValue::String("2024/02/29".into()))
            .unwrap();
        assert!(fm.get("publishedAt").and_then(FieldValue::as_date).is_some());
        assert!(fm
            .insert("publishedAt", FieldValue::String("soon".into()))
            .is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let utc = parse_date_string("2024-01-15T10:30:00Z").unwrap();
        let naive = parse_date_string("2024-01-15 10:30:00").unwrap();
        assert_eq!(utc, naive);

        let offset = parse_date_string("2024-01-15T18:30:00+08:00").unwrap();
        assert_eq!(offset, utc);

        assert!(parse_date_string("2024/01/15").is_some());
        assert!(parse_date_string("15 Jan 2024").is_none());
    }
}
