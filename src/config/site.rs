//! Site configuration (_config.yml)

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::content::MissingDate;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Cache time-to-live in seconds
    pub cache_ttl: u64,

    /// Date given to documents that do not declare one
    pub missing_date: MissingDate,

    /// Content collections by name, in declaration order
    pub collections: IndexMap<String, CollectionConfig>,

    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut collections = IndexMap::new();
        collections.insert(
            "notes".to_string(),
            CollectionConfig {
                dir: "app/notes".to_string(),
                default_category: Some("Uncategorized".to_string()),
            },
        );
        collections.insert(
            "blog".to_string(),
            CollectionConfig {
                dir: "app/blog".to_string(),
                default_category: None,
            },
        );

        Self {
            cache_ttl: 300,
            missing_date: MissingDate::Epoch,
            collections,
            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Cache time-to-live as a duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

/// One content directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Directory, relative to the site base directory unless absolute
    pub dir: String,

    /// Category for documents that do not declare one
    #[serde(default)]
    pub default_category: Option<String>,
}

/// JSON API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}
