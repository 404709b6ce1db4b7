use std::sync::Arc;

use crate::extraction::PlaceExtractor;
use crate::geo::{GeocodeCache, Geocoder};
use crate::models::Coordinate;

/// Place names in extraction order plus the coordinate of the first one,
/// if it resolved.
#[derive(Debug, Default)]
pub struct ResolvedLocations {
    pub locations: Vec<String>,
    pub primary: Option<Coordinate>,
}

/// Extracts place-name candidates from item text and resolves the first
/// through the geocode cache. Extraction failure degrades to no
/// locations, never to an error.
pub struct LocationResolver {
    extractor: Arc<dyn PlaceExtractor>,
    geocoder: Arc<dyn Geocoder>,
}

impl LocationResolver {
    pub fn new(
        extractor: impl PlaceExtractor + 'static,
        geocoder: impl Geocoder + 'static,
    ) -> Self {
        Self {
            extractor: Arc::new(extractor),
            geocoder: Arc::new(geocoder),
        }
    }

    pub async fn resolve(&self, text: &str, cache: &mut GeocodeCache) -> ResolvedLocations {
        let candidates = match self.extractor.extract_places(text).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("Entity extraction failed: {}", e);
                return ResolvedLocations::default();
            }
        };

        let locations = dedup_preserving_order(candidates);

        let primary = match locations.first() {
            Some(first) => cache.resolve(first, self.geocoder.as_ref()).await,
            None => None,
        };

        ResolvedLocations { locations, primary }
    }
}

fn dedup_preserving_order(candidates: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    candidates
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty() && seen.insert(c.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::error::{Error, Result};

    struct FixedExtractor(Vec<&'static str>);

    #[async_trait]
    impl PlaceExtractor for FixedExtractor {
        async fn extract_places(&self, _text: &str) -> Result<Vec<String>> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    struct BrokenExtractor;

    #[async_trait]
    impl PlaceExtractor for BrokenExtractor {
        async fn extract_places(&self, _text: &str) -> Result<Vec<String>> {
            Err(Error::Extraction("ner down".to_string()))
        }
    }

    struct FixedGeocoder(Option<Coordinate>);

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn geocode(&self, _place: &str) -> Result<Option<Coordinate>> {
            Ok(self.0)
        }
    }

    #[tokio::test]
    async fn test_dedup_keeps_extraction_order() {
        let resolver = LocationResolver::new(
            FixedExtractor(vec!["Kyiv", "Warsaw", "Kyiv", "Berlin"]),
            FixedGeocoder(Some(Coordinate { lat: 50.45, lon: 30.52 })),
        );
        let mut cache = GeocodeCache::new();

        let resolved = resolver.resolve("text", &mut cache).await;
        assert_eq!(resolved.locations, vec!["Kyiv", "Warsaw", "Berlin"]);
        assert!(resolved.primary.is_some());
    }

    #[tokio::test]
    async fn test_extraction_failure_yields_empty_list() {
        let resolver = LocationResolver::new(
            BrokenExtractor,
            FixedGeocoder(Some(Coordinate { lat: 0.0, lon: 0.0 })),
        );
        let mut cache = GeocodeCache::new();

        let resolved = resolver.resolve("text", &mut cache).await;
        assert!(resolved.locations.is_empty());
        assert!(resolved.primary.is_none());
    }

    #[tokio::test]
    async fn test_no_candidates_means_no_primary() {
        let resolver = LocationResolver::new(
            FixedExtractor(vec![]),
            FixedGeocoder(Some(Coordinate { lat: 1.0, lon: 1.0 })),
        );
        let mut cache = GeocodeCache::new();

        let resolved = resolver.resolve("text", &mut cache).await;
        assert!(resolved.locations.is_empty());
        assert!(resolved.primary.is_none());
    }

    #[tokio::test]
    async fn test_unresolvable_primary_is_none_but_locations_kept() {
        let resolver = LocationResolver::new(
            FixedExtractor(vec!["Atlantis"]),
            FixedGeocoder(None),
        );
        let mut cache = GeocodeCache::new();

        let resolved = resolver.resolve("text", &mut cache).await;
        assert_eq!(resolved.locations, vec!["Atlantis"]);
        assert!(resolved.primary.is_none());
    }
}
