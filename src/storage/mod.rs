pub mod sqlite;

use std::collections::HashSet;

use crate::error::Result;
use crate::models::EnrichedArticle;

pub use sqlite::SqliteStore;

/// Durable article repository keyed by link. The query operation is the
/// sole read interface the presentation layer needs.
pub trait ArticleRepository: Send {
    /// Every link currently stored; queried once per run for dedup.
    fn known_links(&self) -> Result<HashSet<String>>;

    /// Inserts the article, or replaces all enrichment fields when the
    /// link is already present. The link itself never changes.
    fn upsert(&self, article: &EnrichedArticle) -> Result<()>;

    /// Articles whose dominant category is in `categories` (all when
    /// `None`) and whose risk score is at least `min_risk`, ordered by
    /// publication time ascending with unparseable timestamps last.
    fn query(
        &self,
        categories: Option<&HashSet<String>>,
        min_risk: f32,
    ) -> Result<Vec<EnrichedArticle>>;

    /// Distinct non-Unknown dominant categories, for populating filter
    /// controls.
    fn distinct_categories(&self) -> Result<Vec<String>>;
}
