use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Feed fetch error: {0}")]
    Fetch(String),

    #[error("Analysis API error: {0}")]
    Analysis(String),

    #[error("Entity extraction error: {0}")]
    Extraction(String),

    #[error("Geocoding error: {0}")]
    Geocode(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Persistence failures are the only errors that abort a pipeline run;
    /// everything else degrades to a fallback at the owning component.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Database(_) | Error::Io(_))
    }
}
