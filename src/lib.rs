//! notes-rs: content loading and caching for a Markdown/MDX notes and blog site
//!
//! This crate scans content directories, parses front-matter, derives
//! reading times and serves cached queries by slug, category and search
//! term to whatever renders the site.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod server;

use anyhow::Result;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

use content::ContentRepository;

/// The main site: configuration plus one repository per collection
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    collections: IndexMap<String, ContentRepository>,
}

impl Site {
    /// Create a site from a directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let collections = config
            .collections
            .iter()
            .map(|(name, collection)| {
                let mut repo = ContentRepository::new(base_dir.join(&collection.dir))
                    .with_ttl(config.ttl())
                    .with_missing_date(config.missing_date);
                if let Some(category) = &collection.default_category {
                    repo = repo.with_default_category(category.clone());
                }
                tracing::debug!("Collection {} -> {:?}", name, repo.root());
                (name.clone(), repo)
            })
            .collect();

        Self {
            config,
            collections,
        }
    }

    /// Repository for a named collection
    pub fn collection(&self, name: &str) -> Option<&ContentRepository> {
        self.collections.get(name)
    }

    /// Like [`Site::collection`], with an error naming the available collections
    pub fn require_collection(&self, name: &str) -> Result<&ContentRepository> {
        self.collection(name).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown collection: {}. Available: {}",
                name,
                self.collection_names().join(", ")
            )
        })
    }

    /// Collection names in configuration order
    pub fn collection_names(&self) -> Vec<&str> {
        self.collections.keys().map(String::as_str).collect()
    }
}
