//! Show a single item

use anyhow::Result;

use crate::Site;

/// Print an item as pretty JSON
pub fn run(site: &Site, collection: &str, slug: &str) -> Result<()> {
    let repo = site.require_collection(collection)?;

    let Some(item) = repo.get_by_slug(slug) else {
        anyhow::bail!("No {} item with slug: {}", collection, slug);
    };

    println!("{}", serde_json::to_string_pretty(&item)?);
    Ok(())
}
