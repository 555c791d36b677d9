//! Directory scanner - finds loadable documents under a content root

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::ContentError;

/// Entry file inside a directory-form document
pub const DIRECTORY_ENTRY: &str = "page.mdx";

/// Route handler files that are never content on their own
const RESERVED_FILES: &[&str] = &["page.mdx", "page.tsx"];

/// How a document is laid out on disk.
///
/// The ordering is the lookup precedence: when the same slug exists in
/// several forms, the smallest variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryLayout {
    /// `<slug>/page.mdx`
    Directory,
    /// `<slug>.md`
    Markdown,
    /// `<slug>.mdx`
    Mdx,
}

impl EntryLayout {
    /// All layouts in precedence order
    pub const ALL: [EntryLayout; 3] = [Self::Directory, Self::Markdown, Self::Mdx];

    /// Path this layout would use for `slug` under `root`
    pub fn path_for(self, root: &Path, slug: &str) -> PathBuf {
        match self {
            Self::Directory => root.join(slug).join(DIRECTORY_ENTRY),
            Self::Markdown => root.join(format!("{}.md", slug)),
            Self::Mdx => root.join(format!("{}.mdx", slug)),
        }
    }
}

/// A document found by [`scan`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub slug: String,
    pub path: PathBuf,
    pub layout: EntryLayout,
}

/// List the documents directly under `root`.
///
/// A missing root yields no entries. Failing to list the root is an error;
/// a single unreadable entry is skipped.
pub fn scan(root: &Path) -> Result<Vec<ScanEntry>, ContentError> {
    if !root.exists() {
        tracing::warn!("Content directory not found: {:?}", root);
        return Ok(Vec::new());
    }

    let mut found: HashMap<String, ScanEntry> = HashMap::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(1).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(ContentError::Listing {
                    root: root.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {:?}: {}", root, e);
                continue;
            }
        };

        let Some(name) = entry.file_name().to_str() else {
            tracing::debug!("Skipping non UTF-8 name: {:?}", entry.path());
            continue;
        };

        let candidate = if entry.file_type().is_dir() {
            directory_entry(entry.path(), name)
        } else if entry.file_type().is_file() {
            file_entry(entry.path(), name)
        } else {
            None
        };

        if let Some(candidate) = candidate {
            insert_by_precedence(&mut found, candidate);
        }
    }

    let mut entries: Vec<ScanEntry> = found.into_values().collect();
    entries.sort_by(|a, b| a.slug.cmp(&b.slug));
    Ok(entries)
}

/// `<name>/page.mdx`, unless the directory is a route parameter like `[slug]`
fn directory_entry(dir: &Path, name: &str) -> Option<ScanEntry> {
    if name.starts_with('[') {
        return None;
    }

    let page = dir.join(DIRECTORY_ENTRY);
    page.is_file().then(|| ScanEntry {
        slug: name.to_string(),
        path: page,
        layout: EntryLayout::Directory,
    })
}

/// A flat `.md` / `.mdx` file that is not a route handler
fn file_entry(path: &Path, name: &str) -> Option<ScanEntry> {
    if RESERVED_FILES.contains(&name) {
        return None;
    }

    let (slug, layout) = if let Some(stem) = name.strip_suffix(".mdx") {
        (stem, EntryLayout::Mdx)
    } else if let Some(stem) = name.strip_suffix(".md") {
        (stem, EntryLayout::Markdown)
    } else {
        return None;
    };

    if slug.is_empty() {
        return None;
    }

    Some(ScanEntry {
        slug: slug.to_string(),
        path: path.to_path_buf(),
        layout,
    })
}

fn insert_by_precedence(found: &mut HashMap<String, ScanEntry>, candidate: ScanEntry) {
    match found.get(&candidate.slug) {
        Some(existing) if existing.layout <= candidate.layout => {
            tracing::debug!(
                "Ignoring {:?}: slug {} already provided by {:?}",
                candidate.path,
                candidate.slug,
                existing.path
            );
        }
        _ => {
            found.insert(candidate.slug.clone(), candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn slugs(entries: &[ScanEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.slug.as_str()).collect()
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let entries = scan(&dir.path().join("nope")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_flat_files_and_directories() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("hello-world.md"), "hi").unwrap();
        fs::write(root.join("second.mdx"), "hi").unwrap();
        fs::write(root.join("notes.txt"), "not content").unwrap();
        fs::create_dir(root.join("legacy")).unwrap();
        fs::write(root.join("legacy/page.mdx"), "hi").unwrap();
        fs::create_dir(root.join("empty-dir")).unwrap();

        let entries = scan(root).unwrap();
        assert_eq!(slugs(&entries), vec!["hello-world", "legacy", "second"]);

        let legacy = &entries[1];
        assert_eq!(legacy.layout, EntryLayout::Directory);
        assert_eq!(legacy.path, root.join("legacy").join("page.mdx"));
        assert_eq!(entries[2].layout, EntryLayout::Mdx);
    }

    #[test]
    fn test_skips_route_parameters_and_handlers() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("[slug]")).unwrap();
        fs::write(root.join("[slug]/page.mdx"), "route").unwrap();
        fs::write(root.join("page.mdx"), "index route").unwrap();
        fs::write(root.join("page.tsx"), "export default").unwrap();
        fs::write(root.join("kept.md"), "hi").unwrap();

        let entries = scan(root).unwrap();
        assert_eq!(slugs(&entries), vec!["kept"]);
    }

    #[test]
    fn test_duplicate_slugs_follow_precedence() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("both")).unwrap();
        fs::write(root.join("both/page.mdx"), "dir").unwrap();
        fs::write(root.join("both.md"), "flat").unwrap();
        fs::write(root.join("pair.md"), "md").unwrap();
        fs::write(root.join("pair.mdx"), "mdx").unwrap();

        let entries = scan(root).unwrap();
        assert_eq!(slugs(&entries), vec!["both", "pair"]);
        assert_eq!(entries[0].layout, EntryLayout::Directory);
        assert_eq!(entries[1].layout, EntryLayout::Markdown);
    }

    #[test]
    fn test_nested_files_are_not_scanned() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("drafts")).unwrap();
        fs::write(root.join("drafts/wip.md"), "hi").unwrap();

        assert!(scan(root).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_root_is_a_listing_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("hidden.md"), "hi").unwrap();
        fs::set_permissions(root, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores permission bits
        let readable = fs::read_dir(root).is_ok();
        let result = scan(root);
        fs::set_permissions(root, fs::Permissions::from_mode(0o755)).unwrap();
        if readable {
            return;
        }

        match result {
            Err(ContentError::Listing { root: failed, .. }) => assert_eq!(failed, root),
            other => panic!("expected a listing error, got {:?}", other),
        }
    }

    #[test]
    fn test_path_for_layouts() {
        let root = Path::new("/content");
        assert_eq!(
            EntryLayout::Directory.path_for(root, "a"),
            PathBuf::from("/content/a/page.mdx")
        );
        assert_eq!(
            EntryLayout::Markdown.path_for(root, "a"),
            PathBuf::from("/content/a.md")
        );
        assert_eq!(
            EntryLayout::Mdx.path_for(root, "a"),
            PathBuf::from("/content/a.mdx")
        );
    }
}
