use serde::{Deserialize, Serialize};

use crate::models::article::CategoryScores;
use crate::taxonomy::normalize_category;

/// The analysis response exactly as the LLM produced it, before any
/// validation. Confidence and risk values may be out of range and
/// category keys may be outside the taxonomy.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAnalysis {
    pub summary: String,
    #[serde(default)]
    pub categories: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub overall_risk_score: f64,
}

/// A validated analysis: every confidence and the risk score clamped
/// into [0, 1], category keys restricted to the fixed taxonomy.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub category_scores: CategoryScores,
    pub overall_risk_score: f32,
}

impl RawAnalysis {
    pub fn validate(self) -> AnalysisResult {
        let mut scores = CategoryScores::new();
        // serde_json's preserve_order keeps the response's key order, which
        // is what the dominant-category tie-break relies on.
        for (key, value) in &self.categories {
            let Some(category) = normalize_category(key) else {
                tracing::debug!("Dropping unknown category key: {}", key);
                continue;
            };
            let Some(confidence) = value.as_f64() else {
                tracing::debug!("Dropping non-numeric confidence for {}", category);
                continue;
            };
            if !scores.contains(category) {
                scores.insert(category, clamp_unit(confidence));
            }
        }

        AnalysisResult {
            summary: self.summary,
            category_scores: scores,
            overall_risk_score: clamp_unit(self.overall_risk_score),
        }
    }
}

fn clamp_unit(value: f64) -> f32 {
    value.clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(categories: serde_json::Value, risk: f64) -> RawAnalysis {
        RawAnalysis {
            summary: "s".to_string(),
            categories: categories.as_object().cloned().unwrap_or_default(),
            overall_risk_score: risk,
        }
    }

    #[test]
    fn test_validate_clamps_out_of_range() {
        let result = raw(json!({"cyber": 1.7, "military": -0.2}), 2.5).validate();
        assert_eq!(result.overall_risk_score, 1.0);
        let scores: Vec<_> = result.category_scores.iter().collect();
        assert_eq!(scores, vec![("cyber", 1.0), ("military", 0.0)]);
    }

    #[test]
    fn test_validate_drops_unknown_categories() {
        let result = raw(json!({"economic": 0.9, "political": 0.4}), 0.3).validate();
        assert_eq!(result.category_scores.len(), 1);
        assert_eq!(result.category_scores.dominant(), Some("political"));
    }

    #[test]
    fn test_validate_normalizes_key_case() {
        let result = raw(json!({"Cyber": 0.6}), 0.0).validate();
        assert_eq!(result.category_scores.dominant(), Some("cyber"));
    }

    #[test]
    fn test_validate_preserves_response_order() {
        let result = raw(json!({"military": 0.5, "cyber": 0.5}), 0.0).validate();
        assert_eq!(result.category_scores.dominant(), Some("military"));
    }
}
