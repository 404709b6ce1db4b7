use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// The external named-entity-extraction collaborator: free text in,
/// place-name candidates out, in the order the extractor found them.
#[async_trait]
pub trait PlaceExtractor: Send + Sync {
    async fn extract_places(&self, text: &str) -> Result<Vec<String>>;
}

/// HTTP client for an NER service exposing a spaCy-style entity API.
/// Entities labeled GPE (geopolitical entity) or LOC are treated as
/// place names; everything else is ignored.
pub struct NerClient {
    client: Client,
    endpoint: String,
}

#[derive(Serialize)]
struct NerRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct NerResponse {
    #[serde(default)]
    entities: Vec<Entity>,
}

#[derive(Deserialize)]
struct Entity {
    text: String,
    label: String,
}

impl NerClient {
    pub fn new(endpoint: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl PlaceExtractor for NerClient {
    async fn extract_places(&self, text: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&NerRequest { text })
            .send()
            .await
            .map_err(|e| Error::Extraction(format!("Failed to reach NER service: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Extraction(format!(
                "NER service returned status {}",
                response.status()
            )));
        }

        let result: NerResponse = response
            .json()
            .await
            .map_err(|e| Error::Extraction(format!("Failed to parse NER response: {}", e)))?;

        Ok(result
            .entities
            .into_iter()
            .filter(|e| e.label == "GPE" || e.label == "LOC")
            .map(|e| e.text)
            .collect())
    }
}
