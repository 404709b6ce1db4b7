use std::sync::Arc;

use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;

use crate::error::Result;
use crate::feeds::source::FeedConfig;
use crate::feeds::transport::FeedTransport;
use crate::models::RawItem;

/// Bounded-concurrency retrieval across all configured feeds. One failing
/// source never takes down the others; its error is logged and its items
/// are simply absent from the batch.
pub struct FeedFetcher {
    transport: Arc<dyn FeedTransport>,
    feeds: Vec<FeedConfig>,
    concurrency: usize,
    per_feed_cap: usize,
}

impl FeedFetcher {
    pub fn new(
        transport: impl FeedTransport + 'static,
        feeds: Vec<FeedConfig>,
        concurrency: usize,
        per_feed_cap: usize,
    ) -> Self {
        Self {
            transport: Arc::new(transport),
            feeds,
            concurrency: concurrency.max(1),
            per_feed_cap,
        }
    }

    /// Fetches every feed, at most `concurrency` in flight at once, and
    /// merges the results. Items missing a title or link are dropped.
    /// No ordering guarantee is made across sources.
    pub async fn fetch_all(&self) -> Result<Vec<RawItem>> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        let pb = ProgressBar::new(self.feeds.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} feeds")
                .unwrap()
                .progress_chars("#>-"),
        );

        let mut fetch_futures = Vec::new();

        for feed in &self.feeds {
            let transport = self.transport.clone();
            let sem = semaphore.clone();
            let feed = feed.clone();
            let cap = self.per_feed_cap;
            let pb_clone = pb.clone();

            fetch_futures.push(async move {
                let _permit = sem.acquire().await.ok()?;

                let result = transport.fetch(&feed).await;
                pb_clone.inc(1);

                match result {
                    Ok(items) => {
                        let mut items: Vec<_> = items
                            .into_iter()
                            .filter(|item| !item.title.is_empty() && !item.link.is_empty())
                            .collect();
                        items.truncate(cap);
                        tracing::info!("Fetched {} items from {}", items.len(), feed.name);
                        Some(items)
                    }
                    Err(e) => {
                        tracing::warn!("Skipping feed {}: {}", feed.name, e);
                        None
                    }
                }
            });
        }

        let results = join_all(fetch_futures).await;
        pb.finish_with_message("Fetched all feeds");

        Ok(results.into_iter().flatten().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::error::Error;

    struct MockTransport {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl FeedTransport for MockTransport {
        async fn fetch(&self, feed: &FeedConfig) -> Result<Vec<RawItem>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match feed.name.as_str() {
                "broken" => Err(Error::Fetch("boom".to_string())),
                name => Ok(vec![
                    RawItem {
                        title: format!("{} story", name),
                        link: format!("https://example.com/{}/1", name),
                        pub_date: String::new(),
                        description: "d".to_string(),
                    },
                    RawItem {
                        title: String::new(),
                        link: format!("https://example.com/{}/untitled", name),
                        pub_date: String::new(),
                        description: "dropped: no title".to_string(),
                    },
                    RawItem {
                        title: format!("{} unlinked", name),
                        link: String::new(),
                        pub_date: String::new(),
                        description: "dropped: no link".to_string(),
                    },
                ]),
            }
        }
    }

    fn feeds(names: &[&str]) -> Vec<FeedConfig> {
        names
            .iter()
            .map(|n| FeedConfig::new(n, &format!("https://example.com/{}/rss", n)))
            .collect()
    }

    #[tokio::test]
    async fn test_failed_source_does_not_abort_others() {
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = FeedFetcher::new(
            MockTransport { calls: calls.clone() },
            feeds(&["a", "broken", "b"]),
            2,
            50,
        );

        let items = fetcher.fetch_all().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        // Fetch order is unspecified; compare as a set.
        let links: HashSet<_> = items.iter().map(|i| i.link.as_str()).collect();
        let expected: HashSet<_> = ["https://example.com/a/1", "https://example.com/b/1"]
            .into_iter()
            .collect();
        assert_eq!(links, expected);
    }

    #[tokio::test]
    async fn test_items_without_title_or_link_are_dropped() {
        let fetcher = FeedFetcher::new(
            MockTransport { calls: Arc::new(AtomicUsize::new(0)) },
            feeds(&["a"]),
            1,
            50,
        );

        let items = fetcher.fetch_all().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "a story");
    }

    #[tokio::test]
    async fn test_per_feed_cap_applies() {
        struct ManyItems;

        #[async_trait]
        impl FeedTransport for ManyItems {
            async fn fetch(&self, _feed: &FeedConfig) -> Result<Vec<RawItem>> {
                Ok((0..20)
                    .map(|i| RawItem {
                        title: format!("t{}", i),
                        link: format!("https://example.com/{}", i),
                        pub_date: String::new(),
                        description: String::new(),
                    })
                    .collect())
            }
        }

        let fetcher = FeedFetcher::new(ManyItems, feeds(&["a"]), 1, 5);
        let items = fetcher.fetch_all().await.unwrap();
        assert_eq!(items.len(), 5);
    }
}
