//! Content item models

use chrono::{DateTime, Datelike, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::helpers::parse_date;

/// A note or blog post loaded from disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Slug (file or directory name)
    pub slug: String,

    /// Title, defaulting to the humanized slug
    pub title: String,

    /// Date string as written in front-matter, or the missing-date default
    pub date: String,

    /// Short description
    pub description: String,

    /// Category, if the document or its collection provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Estimated reading time ("N min read")
    pub read_time: String,

    /// Markdown/MDX body without front-matter
    pub content: String,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl ContentItem {
    /// Parse the date string, if it is in a recognised format
    pub fn parsed_date(&self) -> Option<DateTime<Utc>> {
        parse_date(&self.date)
    }

    /// Case-insensitive category comparison
    pub fn in_category(&self, category: &str) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| c.to_lowercase() == category.to_lowercase())
    }

    /// Whether title, content or description contains `query_lower`.
    /// The query must already be lowercased.
    pub fn matches(&self, query_lower: &str) -> bool {
        [&self.title, &self.content, &self.description]
            .iter()
            .any(|field| field.to_lowercase().contains(query_lower))
    }
}

/// Listing projection of a [`ContentItem`] without the body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub read_time: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl From<&ContentItem> for ContentSummary {
    fn from(item: &ContentItem) -> Self {
        Self {
            slug: item.slug.clone(),
            title: item.title.clone(),
            date: item.date.clone(),
            read_time: item.read_time.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
        }
    }
}

/// Items published in one year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearGroup {
    pub year: i32,
    pub items: Vec<ContentSummary>,
}

/// Group date-sorted items by year, newest year first.
/// Items whose date cannot be parsed are left out.
pub(crate) fn group_by_year(items: &[ContentItem]) -> Vec<YearGroup> {
    let mut groups: Vec<YearGroup> = Vec::new();

    for item in items {
        let Some(date) = item.parsed_date() else {
            tracing::debug!("Skipping {} in archive: unparseable date", item.slug);
            continue;
        };
        let year = date.year();

        match groups.iter_mut().find(|g| g.year == year) {
            Some(group) => group.items.push(item.into()),
            None => groups.push(YearGroup {
                year,
                items: vec![item.into()],
            }),
        }
    }

    groups.sort_by(|a, b| b.year.cmp(&a.year));
    groups
}
