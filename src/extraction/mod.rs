pub mod ner;

pub use ner::{NerClient, PlaceExtractor};
