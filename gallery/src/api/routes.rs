use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::models::{ApiResponse, ListingsPayload};
use crate::services::{AppError, GalleryService};
use pipeline::Listing;

pub async fn market_listings(
    State(service): State<Arc<GalleryService>>,
) -> Result<Json<ApiResponse<ListingsPayload>>, AppError> {
    let listings = service.market_listings().await.map_err(AppError::from)?;
    Ok(Json(ApiResponse::success(ListingsPayload::new(listings))))
}

pub async fn listing_detail(
    Path(token_id): Path<u64>,
    State(service): State<Arc<GalleryService>>,
) -> Result<Json<ApiResponse<Listing>>, AppError> {
    let listing = service
        .listing_detail(token_id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(ApiResponse::success(listing)))
}

pub async fn wallet_listings(
    Path(address): Path<String>,
    State(service): State<Arc<GalleryService>>,
) -> Result<Json<ApiResponse<ListingsPayload>>, AppError> {
    if !is_address(&address) {
        return Err(AppError::bad_request(format!(
            "'{}' is not a wallet address",
            address
        )));
    }

    let listings = service
        .wallet_listings(&address)
        .await
        .map_err(AppError::from)?;
    Ok(Json(ApiResponse::success(ListingsPayload::new(listings))))
}

fn is_address(value: &str) -> bool {
    match value.strip_prefix("0x") {
        Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

// Define all API routes
pub fn routes(service: Arc<GalleryService>) -> Router {
    Router::new()
        .route("/api/listings", get(market_listings))
        .route("/api/listings/{token_id}", get(listing_detail))
        .route("/api/wallets/{address}/listings", get(wallet_listings))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hex_addresses_only() {
        assert!(is_address("0x6AeD57D577542A04646eA9b1780adB6288768242"));
        assert!(is_address("0xabc123"));
        assert!(!is_address("0x"));
        assert!(!is_address(""));
        assert!(!is_address("6AeD57D577542A04646eA9b1780adB6288768242"));
        assert!(!is_address("0xNOTHEX"));
    }
}
