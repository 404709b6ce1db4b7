use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::models::Coordinate;

/// The external geocoding collaborator: place name in, coordinates out.
/// `Ok(None)` means the service answered but knows no such place.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinate>>;
}

/// Geocoder backed by the public Nominatim search API.
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

impl NominatimClient {
    pub fn new() -> Result<Self> {
        // Nominatim's usage policy requires an identifying user agent.
        let client = Client::builder()
            .user_agent("newswatch/0.1")
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: "https://nominatim.openstreetmap.org".to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinate>> {
        let url = format!("{}/search", self.base_url);
        tracing::debug!("Geocoding: {}", place);

        let response = self
            .client
            .get(&url)
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Geocode(format!(
                "Nominatim returned status {} for {}",
                response.status(),
                place
            )));
        }

        let hits: Vec<SearchHit> = response
            .json()
            .await
            .map_err(|e| Error::Geocode(format!("Failed to parse Nominatim response: {}", e)))?;

        let Some(hit) = hits.into_iter().next() else {
            return Ok(None);
        };

        let lat = hit
            .lat
            .parse()
            .map_err(|_| Error::Geocode(format!("Non-numeric latitude for {}", place)))?;
        let lon = hit
            .lon
            .parse()
            .map_err(|_| Error::Geocode(format!("Non-numeric longitude for {}", place)))?;

        Ok(Some(Coordinate { lat, lon }))
    }
}
