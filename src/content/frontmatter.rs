//! Front-matter parsing

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};
use tracing::warn;

use super::ContentError;

lazy_static! {
    /// A line holding only the `---` delimiter (trailing whitespace allowed)
    static ref CLOSING_DELIMITER: Regex = Regex::new(r"(?m)^---[ \t]*\r?$").unwrap();
}

/// Keys deserialized into the typed `FrontMatter` fields
const TYPED_FIELDS: &[&str] = &["title", "date", "description", "category", "readTime"];

/// Custom deserializer that accepts any YAML scalar and keeps it as a string.
///
/// Authors write `title: 2024` or `readTime: 5` as often as quoted strings;
/// both forms should land in the typed field instead of failing the document.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct ScalarString;

    impl<'de> Visitor<'de> for ScalarString {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number or boolean")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(ScalarString)
}

/// Front-matter data from a note or post
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub category: Option<String>,
    #[serde(rename = "readTime", deserialize_with = "scalar_string")]
    pub read_time: Option<String>,

    /// Additional custom fields, in source order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), ContentError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let Some(rest) = strip_opening_delimiter(content) else {
            return Ok((FrontMatter::default(), content));
        };

        let Some(closing) = CLOSING_DELIMITER.find(rest) else {
            // No closing ---, treat as no front-matter
            return Ok((FrontMatter::default(), content));
        };

        let yaml = &rest[..closing.start()];
        let body = &rest[closing.end()..];
        let body = body
            .strip_prefix("\r\n")
            .or_else(|| body.strip_prefix('\n'))
            .unwrap_or(body);

        if yaml.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        let mapping = match serde_yaml::from_str::<Value>(yaml)? {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Ok((FrontMatter::default(), body)),
            _ => return Err(ContentError::NotAMapping),
        };

        let fm: FrontMatter = serde_yaml::from_value(Value::Mapping(normalize(mapping)))?;
        Ok((fm, body))
    }
}

/// Give every key its string form and drop typed fields holding collections.
fn normalize(mapping: Mapping) -> Mapping {
    let mut normalized = Mapping::with_capacity(mapping.len());

    for (key, value) in mapping {
        let key = match key {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                warn!("Skipping front-matter key {:?}: not a scalar", other);
                continue;
            }
        };

        let scalar = matches!(
            value,
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
        );
        if !scalar && TYPED_FIELDS.contains(&key.as_str()) {
            warn!("Ignoring front-matter field '{}': expected a single value", key);
            continue;
        }

        normalized.insert(Value::String(key), value);
    }

    normalized
}

/// Strip a `---` first line, returning what follows it
fn strip_opening_delimiter(content: &str) -> Option<&str> {
    let rest = content.strip_prefix("---")?;
    let (line, rest) = match rest.find('\n') {
        Some(pos) => (&rest[..pos], &rest[pos + 1..]),
        None => (rest, ""),
    };

    if line.trim().is_empty() {
        Some(rest)
    } else {
        // `----` or `--- title` is not an opening delimiter
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15
description: First post
category: Rust
readTime: 3 min read
---
This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Hello World".to_string()));
        assert_eq!(fm.date, Some("2024-01-15".to_string()));
        assert_eq!(fm.description, Some("First post".to_string()));
        assert_eq!(fm.category, Some("Rust".to_string()));
        assert_eq!(fm.read_time, Some("3 min read".to_string()));
        assert_eq!(body, "This is the content.\n");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just a heading\n\nSome text.";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_frontmatter() {
        let content = "---\n---\nBody only.";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "Body only.");
    }

    #[test]
    fn test_unclosed_frontmatter_is_body() {
        let content = "---\ntitle: Never closed\n\nText";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, None);
        assert_eq!(body, content);
    }

    #[test]
    fn test_scalar_values_are_stringified() {
        let content = "---\ntitle: 2024\nreadTime: 5\ncategory: true\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("2024".to_string()));
        assert_eq!(fm.read_time, Some("5".to_string()));
        assert_eq!(fm.category, Some("true".to_string()));
    }

    #[test]
    fn test_extra_fields_keep_order() {
        let content = "---\ntitle: T\nzeta: 1\nalpha: [a, b]\ndraft: false\n---\nx";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        let keys: Vec<_> = fm.extra.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "draft"]);
        assert_eq!(fm.extra["draft"], serde_yaml::Value::Bool(false));
    }

    #[test]
    fn test_non_string_keys_are_stringified() {
        let content = "---\ntitle: Retro\n2024: recap\ntrue: yes\n---\nBody";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Retro".to_string()));
        assert_eq!(
            fm.extra["2024"],
            serde_yaml::Value::String("recap".to_string())
        );
        assert!(fm.extra.contains_key("true"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_collection_in_typed_field_is_ignored() {
        let content = "---\ntitle: Tags\ncategory: [a, b]\ndescription:\n  short: s\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Tags".to_string()));
        assert_eq!(fm.category, None);
        assert_eq!(fm.description, None);
        assert!(fm.extra.is_empty());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let content = "---\ntitle: [unclosed\n---\nBody";
        assert!(matches!(
            FrontMatter::parse(content),
            Err(ContentError::Frontmatter(_))
        ));
    }

    #[test]
    fn test_non_mapping_is_an_error() {
        let content = "---\n- just\n- a list\n---\nBody";
        assert!(matches!(
            FrontMatter::parse(content),
            Err(ContentError::NotAMapping)
        ));
    }

    #[test]
    fn test_crlf_and_bom() {
        let content = "\u{feff}---\r\ntitle: Windows\r\n---\r\nLine one\r\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Windows".to_string()));
        assert_eq!(body, "Line one\r\n");
    }

    #[test]
    fn test_body_keeps_later_separators() {
        let content = "---\ntitle: Rules\n---\nAbove\n\n---\n\nBelow";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Rules".to_string()));
        assert_eq!(body, "Above\n\n---\n\nBelow");
    }
}
