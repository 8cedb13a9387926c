pub mod api;
pub mod chain;
pub mod services;

use common::Result;
use common::config::Settings;
use services::GalleryService;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Runs the gallery API server.
pub async fn run_gallery_server(config_path: &str) -> Result<()> {
    // Load configuration
    let config = Settings::new(config_path)?;

    // Initialize gallery service
    let service = Arc::new(GalleryService::new(&config)?);

    // Warm pass over the marketplace so startup logs show what the
    // chain and gateway are currently serving. A dead chain endpoint is
    // reported here but does not stop the server.
    match service.market_listings().await {
        Ok(listings) => println!(
            "Marketplace currently has {} renderable listings",
            listings.len()
        ),
        Err(e) => eprintln!("Startup listing pass failed: {}", e),
    }

    // Create API router
    let api_router = api::routes(Arc::clone(&service));

    // Start the server
    let addr = SocketAddr::from(([127, 0, 0, 1], config.api_port));
    let listener = TcpListener::bind(addr).await?;
    println!("Gallery API server listening on {}", addr);
    axum::serve(listener, api_router).await?;

    Ok(())
}
