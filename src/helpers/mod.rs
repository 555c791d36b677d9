//! Shared helper functions

mod date;

pub use date::*;

/// Turn a slug into a readable title by replacing hyphens with spaces
pub fn humanize_slug(slug: &str) -> String {
    slug.replace('-', " ")
}
