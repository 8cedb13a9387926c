pub mod aggregator;
pub mod fetcher;
pub mod models;
pub mod normalizer;
pub mod resolver;

pub use aggregator::{BatchResult, ListingAggregator};
pub use fetcher::{HttpMetadataFetcher, MetadataSource};
pub use models::{Listing, RawMetadata, TokenRecord};
pub use normalizer::ListingNormalizer;
pub use resolver::MetadataResolver;
