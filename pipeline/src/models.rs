use serde::{Deserialize, Serialize};

/// On-chain marketplace record for one listed token, as returned by the
/// chain read service. Immutable once obtained.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TokenRecord {
    pub token_id: u64,
    /// Metadata pointer for the token, `ipfs://<hash>` or an http(s) URL.
    pub token_uri: String,
    /// Listing price in wei as a base-10 string. The chain value is
    /// authoritative; a price embedded in fetched metadata is ignored.
    pub price_wei: String,
    pub owner: String,
    pub seller: String,
}

/// Metadata document fetched from a resolved pointer. Every field is
/// optional because gateways serve whatever JSON was pinned; validation
/// happens in the normalizer, not here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Display-ready combination of on-chain and off-chain data for one
/// token. Every field is present and non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub token_id: u64,
    /// Ether-denominated decimal string converted from the wei price.
    pub price: String,
    pub owner: String,
    pub seller: String,
    pub name: String,
    pub description: String,
    /// Resolved, fetchable image URL.
    pub image: String,
}
