use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// A feed source descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub name: String,
    pub url: String,
}

impl FeedConfig {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// Curated world-news feeds monitored by default.
pub fn default_feeds() -> Vec<FeedConfig> {
    vec![
        FeedConfig::new("BBC World", "http://feeds.bbci.co.uk/news/world/rss.xml"),
        FeedConfig::new("NPR World", "https://feeds.npr.org/1004/rss.xml"),
        FeedConfig::new("Guardian World", "https://www.theguardian.com/world/rss"),
        FeedConfig::new("AP Top News", "https://feedx.net/rss/ap.xml"),
    ]
}

/// Loads a JSON array of `{"name": ..., "url": ...}` descriptors.
pub fn load_feeds_file<P: AsRef<Path>>(path: P) -> Result<Vec<FeedConfig>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feeds_json() {
        let json = r#"[{"name": "BBC World", "url": "http://feeds.bbci.co.uk/news/world/rss.xml"}]"#;
        let feeds: Vec<FeedConfig> = serde_json::from_str(json).unwrap();
        assert_eq!(feeds.len(), 1);
        assert_eq!(feeds[0].name, "BBC World");
    }
}
