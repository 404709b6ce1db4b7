use std::collections::HashSet;

use crate::models::RawItem;

/// Drops items whose link is already known to the store, and collapses
/// links repeated within the fetched batch itself to their first
/// occurrence. Pure and synchronous.
pub fn dedup_items(items: Vec<RawItem>, known_links: &HashSet<String>) -> Vec<RawItem> {
    let mut seen: HashSet<String> = HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            if known_links.contains(&item.link) {
                return false;
            }
            seen.insert(item.link.clone())
        })
        .collect()
}
