pub mod dedup;
pub mod enricher;
pub mod locations;
pub mod runner;

pub use dedup::dedup_items;
pub use enricher::Enricher;
pub use locations::LocationResolver;
pub use runner::{Pipeline, RunState, RunSummary};
