// Service exports
pub mod cache;
pub mod geocoder;
pub mod narrative;
pub mod overpass;

pub use cache::{CacheError, CacheKey, CacheManager, Caches};
pub use geocoder::{GeocodeError, Geocoder};
pub use narrative::{NarrativeClient, NarrativeError, SiteContext};
pub use overpass::{OverpassClient, OverpassError};
