//! Search a collection

use anyhow::Result;

use super::list::format_items;
use crate::Site;

/// Print items matching `query`
pub fn run(site: &Site, collection: &str, query: &str) -> Result<()> {
    let repo = site.require_collection(collection)?;
    let results = repo.search(query);
    print!(
        "{}",
        format_items(&format!("Results for {:?}", query), &results)
    );
    Ok(())
}
