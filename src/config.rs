use crate::error::{Error, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_model: String,
    pub ner_endpoint: String,
    pub database_path: String,
    pub geocode_cache_path: String,
    pub fetch_concurrency: usize,
    pub per_feed_cap: usize,
    pub enrich_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| Error::Config("OPENAI_API_KEY environment variable not set".to_string()))?;

        let openai_model = env::var("OPENAI_MODEL")
            .unwrap_or_else(|_| "gpt-4".to_string());

        let ner_endpoint = env::var("NER_ENDPOINT")
            .unwrap_or_else(|_| "http://127.0.0.1:8000/ner".to_string());

        let database_path = env::var("DATABASE_PATH")
            .unwrap_or_else(|_| "articles.db".to_string());

        let geocode_cache_path = env::var("GEOCODE_CACHE_PATH")
            .unwrap_or_else(|_| "geocode_cache.json".to_string());

        let fetch_concurrency = env::var("FETCH_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let per_feed_cap = env::var("PER_FEED_CAP")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(50);

        let enrich_delay_ms = env::var("ENRICH_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1000);

        Ok(Self {
            openai_api_key,
            openai_model,
            ner_endpoint,
            database_path,
            geocode_cache_path,
            fetch_concurrency,
            per_feed_cap,
            enrich_delay_ms,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub fetch_concurrency: usize,
    pub per_feed_cap: usize,
    pub enrich_delay_ms: u64,
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            fetch_concurrency: config.fetch_concurrency,
            per_feed_cap: config.per_feed_cap,
            enrich_delay_ms: config.enrich_delay_ms,
        }
    }
}
