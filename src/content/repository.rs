//! Content repository - cached queries over one content directory

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::item::group_by_year;
use super::scanner::{self, EntryLayout};
use super::{read_time, ContentError, ContentItem, FrontMatter, YearGroup};
use crate::cache::{CacheEntry, CacheKey, ContentCache, DEFAULT_TTL};
use crate::helpers::{humanize_slug, iso_timestamp};

/// Date given to documents without one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingDate {
    /// Pin to the Unix epoch so undated documents sort last, deterministically
    #[default]
    Epoch,
    /// Use the time of loading
    Now,
}

impl MissingDate {
    fn resolve(self) -> String {
        match self {
            MissingDate::Epoch => iso_timestamp(&DateTime::<Utc>::default()),
            MissingDate::Now => iso_timestamp(&Utc::now()),
        }
    }
}

/// Cached, read-only view of the documents in one directory.
///
/// Queries never fail: I/O and parse errors are logged and degrade to an
/// empty list or `None`.
#[derive(Debug)]
pub struct ContentRepository {
    root: PathBuf,
    default_category: Option<String>,
    missing_date: MissingDate,
    cache: Mutex<ContentCache>,
}

impl ContentRepository {
    /// Create a repository over `root` with the default TTL
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            default_category: None,
            missing_date: MissingDate::default(),
            cache: Mutex::new(ContentCache::new(DEFAULT_TTL)),
        }
    }

    /// Set the cache time-to-live
    pub fn with_ttl(self, ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(ContentCache::new(ttl)),
            ..self
        }
    }

    /// Category given to documents that do not declare one
    pub fn with_default_category(mut self, category: impl Into<String>) -> Self {
        self.default_category = Some(category.into());
        self
    }

    /// Date policy for documents that do not declare one
    pub fn with_missing_date(mut self, policy: MissingDate) -> Self {
        self.missing_date = policy;
        self
    }

    /// Content root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All documents, newest first
    pub fn get_all(&self) -> Vec<ContentItem> {
        self.all_items().as_ref().clone()
    }

    /// A single document by slug
    pub fn get_by_slug(&self, slug: &str) -> Option<ContentItem> {
        if !is_safe_slug(slug) {
            tracing::debug!("Rejecting slug {:?}", slug);
            return None;
        }

        let key = CacheKey::Item(slug.to_string());
        if let Some(CacheEntry::Item(item)) = self.cache().get(&key, Instant::now()) {
            tracing::debug!("Cache hit: {}", key);
            return Some(item.as_ref().clone());
        }
        tracing::debug!("Cache miss: {}", key);

        let path = EntryLayout::ALL
            .iter()
            .map(|layout| layout.path_for(&self.root, slug))
            .find(|path| path.is_file())?;

        match self.load_item(slug, &path) {
            Ok(item) => {
                let item = Arc::new(item);
                self.cache()
                    .store_item(slug, Arc::clone(&item), Instant::now());
                Some(item.as_ref().clone())
            }
            Err(e) => {
                tracing::error!("Error reading {} ({:?}): {}", slug, path, e);
                None
            }
        }
    }

    /// Documents whose category matches, ignoring case
    pub fn get_by_category(&self, category: &str) -> Vec<ContentItem> {
        self.all_items()
            .iter()
            .filter(|item| item.in_category(category))
            .cloned()
            .collect()
    }

    /// Distinct non-empty categories, sorted
    pub fn get_categories(&self) -> Vec<String> {
        self.all_items()
            .iter()
            .filter_map(|item| item.category.as_deref())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Documents whose title, content or description contain `query`, ignoring case
    pub fn search(&self, query: &str) -> Vec<ContentItem> {
        let query = query.to_lowercase();
        self.all_items()
            .iter()
            .filter(|item| item.matches(&query))
            .cloned()
            .collect()
    }

    /// Most recent document
    pub fn latest(&self) -> Option<ContentItem> {
        self.all_items().first().cloned()
    }

    /// Slugs of all documents, newest first
    pub fn slugs(&self) -> Vec<String> {
        self.all_items().iter().map(|i| i.slug.clone()).collect()
    }

    /// Documents grouped by year, newest year first
    pub fn by_year(&self) -> Vec<YearGroup> {
        group_by_year(&self.all_items())
    }

    /// Drop all cached results; the next query rescans
    pub fn invalidate(&self) {
        self.cache().clear();
    }

    fn cache(&self) -> MutexGuard<'_, ContentCache> {
        // Cache state is always consistent between calls, so a poisoned
        // lock can be reused as-is.
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Cached listing, rescanning on a miss.
    /// The lock is not held while scanning.
    fn all_items(&self) -> Arc<Vec<ContentItem>> {
        if let Some(CacheEntry::List(items)) = self.cache().get(&CacheKey::All, Instant::now()) {
            tracing::debug!("Cache hit: {}", CacheKey::All);
            return items;
        }
        tracing::debug!("Cache miss: {}", CacheKey::All);

        match self.load_all() {
            Ok(items) => {
                let items = Arc::new(items);
                self.cache()
                    .store_listing(Arc::clone(&items), Instant::now());
                items
            }
            Err(e) => {
                tracing::error!("Error reading content from {:?}: {}", self.root, e);
                Arc::new(Vec::new())
            }
        }
    }

    fn load_all(&self) -> Result<Vec<ContentItem>, ContentError> {
        let entries = scanner::scan(&self.root)?;

        let mut items: Vec<ContentItem> = entries
            .iter()
            .filter_map(|entry| match self.load_item(&entry.slug, &entry.path) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", entry.path, e);
                    None
                }
            })
            .collect();

        sort_newest_first(&mut items);
        tracing::debug!("Loaded {} documents from {:?}", items.len(), self.root);
        Ok(items)
    }

    fn load_item(&self, slug: &str, path: &Path) -> Result<ContentItem, ContentError> {
        let raw = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (fm, body) = FrontMatter::parse(&raw)?;
        Ok(self.build_item(slug, fm, body))
    }

    /// Apply defaults to parsed front-matter
    fn build_item(&self, slug: &str, fm: FrontMatter, body: &str) -> ContentItem {
        let FrontMatter {
            title,
            date,
            description,
            category,
            read_time: explicit_read_time,
            mut extra,
        } = fm;

        // Fixed by the loader, never overridden
        for reserved in ["slug", "content"] {
            if extra.shift_remove(reserved).is_some() {
                tracing::warn!("Ignoring front-matter field {:?} in {}", reserved, slug);
            }
        }

        let date = non_empty(date).unwrap_or_else(|| {
            tracing::warn!("{} has no date, using {:?} policy", slug, self.missing_date);
            self.missing_date.resolve()
        });

        ContentItem {
            slug: slug.to_string(),
            title: non_empty(title).unwrap_or_else(|| humanize_slug(slug)),
            date,
            description: description.unwrap_or_default(),
            category: non_empty(category).or_else(|| self.default_category.clone()),
            read_time: non_empty(explicit_read_time).unwrap_or_else(|| read_time(body)),
            content: body.to_string(),
            extra,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Slugs are single path components
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\'])
        && !slug.contains('\0')
}

/// Sort by date descending; the sort is stable, so ties keep scan order.
/// Unparseable dates sort after every parseable one.
fn sort_newest_first(items: &mut [ContentItem]) {
    items.sort_by_cached_key(|item| std::cmp::Reverse(item.parsed_date()));
}
