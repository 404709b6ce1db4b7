pub mod source;
pub mod transport;
pub mod fetcher;

pub use source::{default_feeds, load_feeds_file, FeedConfig};
pub use transport::{FeedTransport, RssTransport};
pub use fetcher::FeedFetcher;
