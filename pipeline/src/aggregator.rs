use std::sync::Arc;

use common::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{info, warn};

use crate::fetcher::MetadataSource;
use crate::models::{Listing, TokenRecord};
use crate::normalizer::ListingNormalizer;
use crate::resolver::MetadataResolver;

/// Outcome of one aggregation pass over a batch of token records.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Successfully normalized listings, in input order.
    pub listings: Vec<Listing>,
    /// Number of records dropped because some pipeline stage failed.
    pub dropped: usize,
}

impl BatchResult {
    fn record_outcome(&mut self, token_id: u64, outcome: Result<Listing>) {
        match outcome {
            Ok(listing) => self.listings.push(listing),
            Err(e) => {
                warn!(token_id, error = %e, "Dropping listing");
                self.dropped += 1;
            }
        }
    }
}

/// Drives resolve -> fetch -> normalize over a batch of token records
/// concurrently. A failure in one record's pipeline drops that record
/// only; sibling records are never cancelled and the batch never errors.
pub struct ListingAggregator {
    resolver: MetadataResolver,
    source: Arc<dyn MetadataSource>,
    normalizer: ListingNormalizer,
    max_concurrency: Option<usize>,
}

impl ListingAggregator {
    pub fn new(
        gateway_base: &str,
        source: Arc<dyn MetadataSource>,
        max_concurrency: Option<usize>,
    ) -> Self {
        let resolver = MetadataResolver::new(gateway_base);
        Self {
            normalizer: ListingNormalizer::new(resolver.clone()),
            resolver,
            source,
            max_concurrency,
        }
    }

    /// Aggregates a batch of token records into display-ready listings.
    ///
    /// All units run concurrently (bounded when `max_concurrency` is
    /// set) and the call returns only after every unit has settled.
    /// Successes keep the relative order of their input records.
    pub async fn aggregate(&self, records: Vec<TokenRecord>) -> BatchResult {
        if records.is_empty() {
            return BatchResult::default();
        }

        let total = records.len();
        let mut outcomes: Vec<(usize, u64, Result<Listing>)> = Vec::with_capacity(total);
        let mut futures = FuturesUnordered::new();

        for (index, record) in records.into_iter().enumerate() {
            futures.push(async move {
                let token_id = record.token_id;
                let outcome = self.process_record(&record).await;
                (index, token_id, outcome)
            });

            if let Some(limit) = self.max_concurrency {
                if futures.len() >= limit {
                    if let Some(settled) = futures.next().await {
                        outcomes.push(settled);
                    }
                }
            }
        }

        while let Some(settled) = futures.next().await {
            outcomes.push(settled);
        }

        // Units settle in network order; the output order is the input
        // order of the records that survived.
        outcomes.sort_by_key(|(index, _, _)| *index);

        let mut result = BatchResult::default();
        for (_, token_id, outcome) in outcomes {
            result.record_outcome(token_id, outcome);
        }

        info!(
            total,
            kept = result.listings.len(),
            dropped = result.dropped,
            "Aggregation pass complete"
        );

        result
    }

    /// Runs resolve -> fetch -> normalize for a single record. Unlike
    /// `aggregate` the failure propagates; detail views have nothing
    /// else to show.
    pub async fn process_record(&self, record: &TokenRecord) -> Result<Listing> {
        let url = self.resolver.resolve(&record.token_uri)?;
        let doc = self.source.fetch(&url).await?;
        self.normalizer.normalize(record, &doc)
    }
}
