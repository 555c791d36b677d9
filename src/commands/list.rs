//! List collection content

use anyhow::Result;

use crate::content::{ContentItem, YearGroup};
use crate::Site;

/// What to list for a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// Every item, optionally restricted to a category
    Items { category: Option<String> },
    /// Distinct categories
    Categories,
    /// Items grouped by year
    Archive,
}

/// List a collection
pub fn run(site: &Site, collection: &str, listing: &Listing) -> Result<()> {
    let repo = site.require_collection(collection)?;

    let output = match listing {
        Listing::Items { category: None } => format_items(collection, &repo.get_all()),
        Listing::Items {
            category: Some(category),
        } => format_items(
            &format!("{} in {}", collection, category),
            &repo.get_by_category(category),
        ),
        Listing::Categories => format_categories(&repo.get_categories()),
        Listing::Archive => format_archive(&repo.by_year()),
    };

    print!("{}", output);
    Ok(())
}

/// One line per item: date, title, read time, category and slug
pub fn format_items(heading: &str, items: &[ContentItem]) -> String {
    let mut out = format!("{} ({}):\n", heading, items.len());
    for item in items {
        let category = item
            .category
            .as_ref()
            .map(|c| format!(" <{}>", c))
            .unwrap_or_default();
        out.push_str(&format!(
            "  {} - {} ({}){} [{}]\n",
            short_date(&item.date),
            item.title,
            item.read_time,
            category,
            item.slug
        ));
    }
    out
}

fn format_categories(categories: &[String]) -> String {
    let mut out = format!("Categories ({}):\n", categories.len());
    for category in categories {
        out.push_str(&format!("  {}\n", category));
    }
    out
}

fn format_archive(groups: &[YearGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        out.push_str(&format!("{}:\n", group.year));
        for item in &group.items {
            out.push_str(&format!(
                "  {} - {} [{}]\n",
                short_date(&item.date),
                item.title,
                item.slug
            ));
        }
    }
    out
}

/// `YYYY-MM-DD` when the date parses, the raw string otherwise
fn short_date(date: &str) -> String {
    crate::helpers::parse_date(date)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentSummary;
    use indexmap::IndexMap;

    fn item(slug: &str, date: &str, category: Option<&str>) -> ContentItem {
        ContentItem {
            slug: slug.to_string(),
            title: slug.to_uppercase(),
            date: date.to_string(),
            description: String::new(),
            category: category.map(str::to_string),
            read_time: "3 min read".to_string(),
            content: String::new(),
            extra: IndexMap::new(),
        }
    }

    #[test]
    fn test_format_items() {
        let items = vec![
            item("a", "2024-02-01T10:00:00.000Z", Some("Web")),
            item("b", "sometime", None),
        ];
        let out = format_items("notes", &items);
        assert_eq!(
            out,
            "notes (2):\n  2024-02-01 - A (3 min read) <Web> [a]\n  sometime - B (3 min read) [b]\n"
        );
    }

    #[test]
    fn test_format_categories() {
        let out = format_categories(&["Design".to_string(), "Web".to_string()]);
        assert_eq!(out, "Categories (2):\n  Design\n  Web\n");
    }

    #[test]
    fn test_format_archive() {
        let groups = vec![
            YearGroup {
                year: 2024,
                items: vec![ContentSummary::from(&item("new", "2024-02-01", None))],
            },
            YearGroup {
                year: 2023,
                items: vec![ContentSummary::from(&item("old", "2023-07-04", None))],
            },
        ];
        assert_eq!(
            format_archive(&groups),
            "2024:\n  2024-02-01 - NEW [new]\n2023:\n  2023-07-04 - OLD [old]\n"
        );
    }
}
