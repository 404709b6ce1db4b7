use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use crate::llm::AnalysisProvider;
use crate::models::{AnalysisResult, CategoryScores};

/// Maximum characters of the original description kept when analysis fails.
pub const FALLBACK_SUMMARY_CHARS: usize = 150;
const TRUNCATION_MARKER: &str = "...";

/// Sequential, rate-limited analysis of item descriptions. Exactly one
/// provider call per item, a fixed pause between calls, and a
/// deterministic degraded result when the provider fails.
pub struct Enricher {
    provider: Arc<dyn AnalysisProvider>,
    delay: Duration,
}

impl Enricher {
    pub fn new(provider: impl AnalysisProvider + 'static, delay_ms: u64) -> Self {
        Self {
            provider: Arc::new(provider),
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// Analyzes one description. Call sites drive items strictly in
    /// sequence; `pace()` supplies the inter-call delay.
    pub async fn enrich(&self, description: &str) -> AnalysisResult {
        match self.provider.analyze(description).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Analysis failed, using fallback: {}", e);
                fallback_analysis(description)
            }
        }
    }

    /// Fixed-rate backpressure for the provider's rate limits.
    pub async fn pace(&self) {
        sleep(self.delay).await;
    }
}

/// The degraded enrichment: a truncation of the original description,
/// no category scores, zero risk.
pub fn fallback_analysis(description: &str) -> AnalysisResult {
    let summary = if description.chars().count() > FALLBACK_SUMMARY_CHARS {
        let truncated: String = description.chars().take(FALLBACK_SUMMARY_CHARS).collect();
        format!("{}{}", truncated, TRUNCATION_MARKER)
    } else {
        format!("{}{}", description, TRUNCATION_MARKER)
    };

    AnalysisResult {
        summary,
        category_scores: CategoryScores::new(),
        overall_risk_score: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::error::{Error, Result};

    struct FailingProvider {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl AnalysisProvider for FailingProvider {
        async fn analyze(&self, _text: &str) -> Result<AnalysisResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::Analysis("service down".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_failure_yields_truncated_fallback() {
        let long_description =
            "Troops mobilized near border region update news wire".repeat(4);
        assert!(long_description.chars().count() > FALLBACK_SUMMARY_CHARS);

        let enricher = Enricher::new(
            FailingProvider { calls: Arc::new(AtomicUsize::new(0)) },
            0,
        );
        let result = enricher.enrich(&long_description).await;

        let expected_prefix: String =
            long_description.chars().take(FALLBACK_SUMMARY_CHARS).collect();
        assert_eq!(result.summary, format!("{}...", expected_prefix));
        assert!(result.category_scores.is_empty());
        assert_eq!(result.overall_risk_score, 0.0);
    }

    #[tokio::test]
    async fn test_exactly_one_call_per_item() {
        let calls = Arc::new(AtomicUsize::new(0));
        let enricher = Enricher::new(FailingProvider { calls: calls.clone() }, 0);

        for description in ["one", "two", "three"] {
            enricher.enrich(description).await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_fallback_short_description_keeps_full_text() {
        let result = fallback_analysis("short text");
        assert_eq!(result.summary, "short text...");
    }
}
