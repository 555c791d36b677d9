//! Content module - scans, parses and serves notes and posts

mod frontmatter;
mod item;
mod read_time;
pub mod repository;
pub mod scanner;

use std::path::PathBuf;
use thiserror::Error;

pub use frontmatter::FrontMatter;
pub use item::{ContentItem, ContentSummary, YearGroup};
pub use read_time::read_time;
pub use repository::{ContentRepository, MissingDate};
pub use scanner::{scan, EntryLayout, ScanEntry};

/// Errors raised while loading content.
///
/// These never cross the repository's query boundary; they are logged and
/// turned into empty results there.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML front-matter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),

    #[error("Front-matter is not a key/value mapping")]
    NotAMapping,

    #[error("Failed to list {root:?}: {source}")]
    Listing {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}
