use std::str::FromStr;

use bigdecimal::BigDecimal;
use common::{Error, Result};
use num::BigInt;
use num::bigint::Sign;

use crate::models::{Listing, RawMetadata, TokenRecord};
use crate::resolver::MetadataResolver;

/// Placeholder used when a metadata document carries no description.
pub const DEFAULT_DESCRIPTION: &str = "No description available";

/// Wei carries 18 decimal places relative to ether.
const WEI_DECIMALS: i64 = 18;

/// Merges one on-chain token record with its fetched metadata into a
/// display-ready listing.
///
/// Policy: image and name are required (the item is dropped upstream
/// otherwise), description is defaulted, and price always comes from
/// the chain record.
pub struct ListingNormalizer {
    resolver: MetadataResolver,
}

impl ListingNormalizer {
    pub fn new(resolver: MetadataResolver) -> Self {
        Self { resolver }
    }

    pub fn normalize(&self, record: &TokenRecord, doc: &RawMetadata) -> Result<Listing> {
        let image_pointer = doc
            .image
            .as_deref()
            .filter(|image| !image.is_empty())
            .ok_or(Error::MissingImage(record.token_id))?;
        let image = self.resolver.resolve(image_pointer)?;

        let name = doc
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(Error::MissingName(record.token_id))?
            .to_string();

        let description = doc
            .description
            .as_deref()
            .filter(|description| !description.is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION)
            .to_string();

        Ok(Listing {
            token_id: record.token_id,
            price: wei_to_ether(&record.price_wei)?,
            owner: record.owner.clone(),
            seller: record.seller.clone(),
            name,
            description,
            image,
        })
    }
}

/// Converts a base-10 wei amount into its exact ether decimal string,
/// with trailing zeros trimmed. 10^18 wei renders as "1".
pub fn wei_to_ether(wei: &str) -> Result<String> {
    let amount = BigInt::from_str(wei.trim())
        .map_err(|e| Error::InvalidInput(format!("invalid wei amount '{}': {}", wei, e)))?;

    if amount.sign() == Sign::Minus {
        return Err(Error::InvalidInput(format!(
            "negative wei amount '{}'",
            wei
        )));
    }

    Ok(BigDecimal::new(amount, WEI_DECIMALS).normalized().to_string())
}
