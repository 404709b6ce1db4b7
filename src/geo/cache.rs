use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::geo::nominatim::Geocoder;
use crate::models::Coordinate;

/// Durable lookaside cache for geocoding results. A `None` value is a
/// negative entry: the service was asked once and had no answer, so it
/// is never asked again for that name.
#[derive(Debug, Default)]
pub struct GeocodeCache {
    entries: HashMap<String, Option<Coordinate>>,
}

impl GeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the cache from disk. A missing or corrupt file starts an
    /// empty cache; cache loss is never fatal to a run.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => {
                    let cache = Self { entries };
                    tracing::info!("Loaded {} geocode cache entries", cache.entries.len());
                    cache
                }
                Err(e) => {
                    tracing::warn!("Geocode cache at {} is corrupt, starting empty: {}", path.display(), e);
                    Self::new()
                }
            },
            Err(_) => {
                tracing::info!("No geocode cache at {}, starting empty", path.display());
                Self::new()
            }
        }
    }

    /// Writes the full in-memory state back, replacing prior contents.
    pub fn flush<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves a place name, consulting the external geocoder only on a
    /// cache miss. Service failures and empty answers both become
    /// negative entries so the name is resolved externally at most once
    /// per cache lifetime.
    pub async fn resolve(&mut self, name: &str, geocoder: &dyn Geocoder) -> Option<Coordinate> {
        let key = name.trim().to_string();
        if key.is_empty() {
            return None;
        }

        if let Some(cached) = self.entries.get(&key) {
            return *cached;
        }

        let resolved = match geocoder.geocode(&key).await {
            Ok(coordinate) => coordinate,
            Err(e) => {
                tracing::warn!("Geocoding failed for {}: {}", key, e);
                None
            }
        };

        self.entries.insert(key, resolved);
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::error::Error;

    struct CountingGeocoder {
        calls: AtomicUsize,
        answer: Option<Coordinate>,
        fail: bool,
    }

    impl CountingGeocoder {
        fn resolving(lat: f64, lon: f64) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                answer: Some(Coordinate { lat, lon }),
                fail: false,
            }
        }

        fn empty() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                answer: None,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                answer: None,
                fail: true,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Geocoder for CountingGeocoder {
        async fn geocode(&self, place: &str) -> Result<Option<Coordinate>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::Geocode(format!("unreachable for {}", place)));
            }
            Ok(self.answer)
        }
    }

    #[tokio::test]
    async fn test_repeat_resolution_hits_cache() {
        let geocoder = CountingGeocoder::resolving(51.5, -0.12);
        let mut cache = GeocodeCache::new();

        let first = cache.resolve("London", &geocoder).await;
        let second = cache.resolve("London", &geocoder).await;

        assert_eq!(first, second);
        assert_eq!(geocoder.calls(), 1);
    }

    #[tokio::test]
    async fn test_negative_entry_prevents_retry() {
        let geocoder = CountingGeocoder::empty();
        let mut cache = GeocodeCache::new();

        assert!(cache.resolve("Atlantis", &geocoder).await.is_none());
        assert!(cache.resolve("Atlantis", &geocoder).await.is_none());
        assert_eq!(geocoder.calls(), 1);
    }

    #[tokio::test]
    async fn test_service_failure_becomes_negative_entry() {
        let geocoder = CountingGeocoder::failing();
        let mut cache = GeocodeCache::new();

        assert!(cache.resolve("Paris", &geocoder).await.is_none());
        assert!(cache.resolve("Paris", &geocoder).await.is_none());
        assert_eq!(geocoder.calls(), 1);
    }

    #[tokio::test]
    async fn test_whitespace_normalization_shares_entry() {
        let geocoder = CountingGeocoder::resolving(48.85, 2.35);
        let mut cache = GeocodeCache::new();

        cache.resolve("Paris", &geocoder).await;
        cache.resolve("  Paris ", &geocoder).await;
        assert_eq!(geocoder.calls(), 1);
    }

    #[tokio::test]
    async fn test_flush_and_load_roundtrip() {
        let geocoder = CountingGeocoder::resolving(35.68, 139.69);
        let mut cache = GeocodeCache::new();
        cache.resolve("Tokyo", &geocoder).await;
        cache.resolve("Nowhere", &CountingGeocoder::empty()).await;

        let path = std::env::temp_dir().join(format!("geocode_cache_test_{}.json", std::process::id()));
        cache.flush(&path).unwrap();

        let reloaded = GeocodeCache::load(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(reloaded.len(), 2);

        // A reloaded negative entry still short-circuits the service.
        let mut reloaded = reloaded;
        let empty = CountingGeocoder::empty();
        assert!(reloaded.resolve("Nowhere", &empty).await.is_none());
        assert_eq!(empty.calls(), 0);
    }

    #[test]
    fn test_load_corrupt_file_starts_empty() {
        let path = std::env::temp_dir().join(format!("geocode_corrupt_test_{}.json", std::process::id()));
        std::fs::write(&path, "{not json").unwrap();
        let cache = GeocodeCache::load(&path);
        std::fs::remove_file(&path).ok();
        assert!(cache.is_empty());
    }
}
