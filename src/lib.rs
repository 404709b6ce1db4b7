pub mod config;
pub mod error;
pub mod models;
pub mod taxonomy;
pub mod feeds;
pub mod llm;
pub mod extraction;
pub mod geo;
pub mod pipeline;
pub mod storage;

pub use config::{Config, PipelineConfig};
pub use error::{Error, Result};
pub use feeds::{FeedFetcher, RssTransport};
pub use geo::{GeocodeCache, NominatimClient};
pub use llm::OpenAiProvider;
pub use pipeline::{Pipeline, RunState, RunSummary};
pub use storage::{ArticleRepository, SqliteStore};
