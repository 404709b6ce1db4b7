use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::feeds::source::FeedConfig;
use crate::models::RawItem;

/// Transport boundary for feed retrieval. The fetcher only sees raw
/// items or a failure; wire format and parsing live behind this trait.
#[async_trait]
pub trait FeedTransport: Send + Sync {
    async fn fetch(&self, feed: &FeedConfig) -> Result<Vec<RawItem>>;
}

/// RSS/Atom transport over HTTP.
pub struct RssTransport {
    client: Client,
}

impl RssTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent("newswatch/0.1")
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedTransport for RssTransport {
    async fn fetch(&self, feed: &FeedConfig) -> Result<Vec<RawItem>> {
        tracing::debug!("Fetching feed: {}", feed.url);
        let response = self.client.get(&feed.url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Fetch(format!(
                "{} returned status {}",
                feed.name,
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        let parsed = feed_rs::parser::parse(bytes.as_ref())
            .map_err(|e| Error::Fetch(format!("failed to parse {}: {}", feed.name, e)))?;

        let items = parsed
            .entries
            .into_iter()
            .map(|entry| RawItem {
                title: entry.title.map(|t| t.content).unwrap_or_default(),
                link: entry.links.first().map(|l| l.href.clone()).unwrap_or_default(),
                pub_date: entry
                    .published
                    .or(entry.updated)
                    .map(|d| d.to_rfc2822())
                    .unwrap_or_default(),
                description: entry.summary.map(|t| t.content).unwrap_or_default(),
            })
            .collect();

        Ok(items)
    }
}
