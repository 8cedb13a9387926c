use std::sync::Arc;

use common::Result;
use common::config::Settings;
use pipeline::{HttpMetadataFetcher, Listing, ListingAggregator};
use tracing::info;

use crate::chain::{ChainReader, HttpChainReader};

/// Orchestrates chain reads and the listing aggregation pipeline.
pub struct GalleryService {
    chain: Arc<dyn ChainReader>,
    aggregator: ListingAggregator,
}

impl GalleryService {
    pub fn new(settings: &Settings) -> Result<Self> {
        // One transport shared by chain queries and gateway fetches;
        // the client is stateless per request and clone-cheap.
        let client = rquest::Client::new();

        let chain: Arc<dyn ChainReader> =
            Arc::new(HttpChainReader::new(client.clone(), &settings.chain));

        let fetcher = Arc::new(HttpMetadataFetcher::new(
            client,
            settings.pipeline.fetch_timeout_ms,
        ));

        let aggregator = ListingAggregator::new(
            &settings.gateway.base_url,
            fetcher,
            settings.pipeline.max_concurrency,
        );

        Ok(Self { chain, aggregator })
    }

    /// Builds a service from explicit parts, for alternate chain
    /// backends and tests.
    pub fn with_parts(chain: Arc<dyn ChainReader>, aggregator: ListingAggregator) -> Self {
        Self { chain, aggregator }
    }

    /// Every listing currently on the marketplace. Fails only when the
    /// chain read itself fails.
    pub async fn market_listings(&self) -> Result<Vec<Listing>> {
        let records = self.chain.get_all_listed_tokens().await?;
        Ok(self.aggregate(records).await)
    }

    /// Listings owned by one wallet address.
    pub async fn wallet_listings(&self, owner: &str) -> Result<Vec<Listing>> {
        let records = self.chain.get_tokens_owned_by(owner).await?;
        Ok(self.aggregate(records).await)
    }

    /// Fully resolved detail for one listed token. A pipeline failure
    /// propagates here instead of dropping; the view has nothing else
    /// to show.
    pub async fn listing_detail(&self, token_id: u64) -> Result<Listing> {
        let record = self.chain.get_listed_token(token_id).await?;
        self.aggregator.process_record(&record).await
    }

    async fn aggregate(&self, records: Vec<pipeline::TokenRecord>) -> Vec<Listing> {
        let batch = self.aggregator.aggregate(records).await;
        if batch.dropped > 0 {
            info!(dropped = batch.dropped, "Dropped listings in this pass");
        }
        batch.listings
    }
}
