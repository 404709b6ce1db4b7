pub mod cache;
pub mod nominatim;

pub use cache::GeocodeCache;
pub use nominatim::{Geocoder, NominatimClient};
