use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{Error, Result};
use crate::feeds::FeedFetcher;
use crate::geo::GeocodeCache;
use crate::models::{AnalysisResult, EnrichedArticle, RawItem};
use crate::pipeline::dedup::dedup_items;
use crate::pipeline::enricher::Enricher;
use crate::pipeline::locations::LocationResolver;
use crate::storage::ArticleRepository;

/// Pipeline stages, entered strictly in order within a single pass.
/// Aborted is reached only on a persistence failure; every other failure
/// is absorbed by the owning component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Fetching,
    Deduplicating,
    Enriching,
    ResolvingLocations,
    Persisting,
    FlushingCache,
    Done,
    Aborted,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub fetched: usize,
    pub new_items: usize,
    pub persisted: usize,
}

pub struct Pipeline<S: ArticleRepository> {
    fetcher: FeedFetcher,
    enricher: Enricher,
    resolver: LocationResolver,
    store: S,
    cache: GeocodeCache,
    cache_path: PathBuf,
    state: RunState,
}

impl<S: ArticleRepository> Pipeline<S> {
    pub fn new(
        fetcher: FeedFetcher,
        enricher: Enricher,
        resolver: LocationResolver,
        store: S,
        cache: GeocodeCache,
        cache_path: PathBuf,
    ) -> Self {
        Self {
            fetcher,
            enricher,
            resolver,
            store,
            cache,
            cache_path,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn advance(&mut self, next: RunState) {
        tracing::debug!("Pipeline state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn abort(&mut self, error: Error) -> Error {
        tracing::error!("Pipeline aborted: {}", error);
        self.state = RunState::Aborted;
        error
    }

    /// One full pass: fetch, dedup, enrich, resolve locations, persist,
    /// flush the geocode cache.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        self.advance(RunState::Fetching);
        let items = self.fetcher.fetch_all().await?;
        summary.fetched = items.len();
        tracing::info!("Fetched {} items", summary.fetched);

        self.advance(RunState::Deduplicating);
        let known = self.store.known_links().map_err(|e| self.abort(e))?;
        let new_items = dedup_items(items, &known);
        summary.new_items = new_items.len();
        tracing::info!("{} items are new ({} already known)", summary.new_items, known.len());

        self.advance(RunState::Enriching);
        let analyses = self.enrich_items(&new_items).await;

        self.advance(RunState::ResolvingLocations);
        let mut articles = Vec::with_capacity(new_items.len());
        for (item, analysis) in new_items.into_iter().zip(analyses) {
            let resolved = self.resolver.resolve(&item.description, &mut self.cache).await;
            articles.push(EnrichedArticle {
                title: item.title,
                link: item.link,
                pub_date: item.pub_date,
                description: item.description,
                summary: analysis.summary,
                category_scores: analysis.category_scores,
                locations: resolved.locations,
                coordinate: resolved.primary,
                overall_risk_score: analysis.overall_risk_score,
            });
        }

        self.advance(RunState::Persisting);
        for article in &articles {
            self.store.upsert(article).map_err(|e| self.abort(e))?;
            summary.persisted += 1;
        }
        tracing::info!("Persisted {} articles", summary.persisted);

        self.advance(RunState::FlushingCache);
        self.cache
            .flush(&self.cache_path)
            .map_err(|e| self.abort(e))?;
        tracing::info!("Flushed {} geocode cache entries", self.cache.len());

        self.advance(RunState::Done);
        Ok(summary)
    }

    async fn enrich_items(&self, items: &[RawItem]) -> Vec<AnalysisResult> {
        let pb = ProgressBar::new(items.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} items")
                .unwrap()
                .progress_chars("#>-"),
        );

        let mut analyses = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            tracing::info!("Analyzing {}/{}: {}", i + 1, items.len(), item.title);
            analyses.push(self.enricher.enrich(&item.description).await);
            pb.inc(1);
            if i + 1 < items.len() {
                self.enricher.pace().await;
            }
        }

        pb.finish_with_message("Enrichment complete");
        analyses
    }
}
