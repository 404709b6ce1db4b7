use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::taxonomy::UNKNOWN_CATEGORY;

/// An item as it comes off a feed, before enrichment. Publication
/// timestamps are kept as the raw feed string since feeds routinely
/// ship malformed dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawItem {
    pub title: String,
    pub link: String,
    pub pub_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Category confidences in insertion order. Order matters: dominant-category
/// ties are broken by whichever key was inserted first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryScores(Vec<(String, f32)>);

impl CategoryScores {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Inserts a score, keeping the original position if the key is
    /// already present.
    pub fn insert(&mut self, name: impl Into<String>, score: f32) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, s)) => *s = score,
            None => self.0.push((name, score)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(n, _)| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.0.iter().map(|(n, s)| (n.as_str(), *s))
    }

    /// The key with the maximum confidence, first inserted wins on ties.
    /// `None` when no scores are present.
    pub fn dominant(&self) -> Option<&str> {
        let mut best: Option<(&str, f32)> = None;
        for (name, score) in self.iter() {
            match best {
                Some((_, s)) if score <= s => {}
                _ => best = Some((name, score)),
            }
        }
        best.map(|(name, _)| name)
    }
}

impl FromIterator<(String, f32)> for CategoryScores {
    fn from_iter<I: IntoIterator<Item = (String, f32)>>(iter: I) -> Self {
        let mut scores = Self::new();
        for (name, score) in iter {
            scores.insert(name, score);
        }
        scores
    }
}

impl Serialize for CategoryScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, score) in &self.0 {
            map.serialize_entry(name, score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ScoresVisitor;

        impl<'de> Visitor<'de> for ScoresVisitor {
            type Value = CategoryScores;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of category name to confidence")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut scores = CategoryScores::new();
                while let Some((name, score)) = access.next_entry::<String, f32>()? {
                    scores.insert(name, score);
                }
                Ok(scores)
            }
        }

        deserializer.deserialize_map(ScoresVisitor)
    }
}

/// The persisted record: a raw item plus everything enrichment added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedArticle {
    pub title: String,
    pub link: String,
    pub pub_date: String,
    pub description: String,
    pub summary: String,
    pub category_scores: CategoryScores,
    pub locations: Vec<String>,
    pub coordinate: Option<Coordinate>,
    pub overall_risk_score: f32,
}

impl EnrichedArticle {
    /// Derived on demand rather than stored, so it can never drift from
    /// the scores.
    pub fn dominant_category(&self) -> &str {
        self.category_scores.dominant().unwrap_or(UNKNOWN_CATEGORY)
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_pub_date(&self.pub_date)
    }
}

/// Lenient publication-date parsing. Feeds mix RFC 2822, RFC 3339 and
/// bare dates; anything unparseable yields `None` and sorts last.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    None
}
