use anyhow::Context;
use application::MarketplaceApp;
use config::Config;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; RUST_LOG overrides the default filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("api_server=debug,tower_http=debug")),
        )
        .init();

    info!("🚀 Starting Marketplace API Server");

    // Load configuration from environment
    let config = Config::from_env(None).context("invalid configuration")?;

    info!("💾 Using database: {}", config.database_path);
    info!("🌐 API server will bind to: {}", config.bind_address());

    let marketplace = Arc::new(MarketplaceApp::new(&config).context("failed to start marketplace")?);
    let app = api_server::router(marketplace);

    // Run the server
    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("🌐 API Server listening on http://{}", bind_address);
    info!("📖 API Documentation:");
    info!("   POST   /api/auth/signup             - Create an account");
    info!("   POST   /api/auth/login              - Log in");
    info!("   GET    /api/auth/check              - Current account");
    info!("   PUT    /api/auth/update-profile     - Update profile");
    info!("   GET    /api/products                - List products (filters, paging)");
    info!("   POST   /api/products                - Create product");
    info!("   GET    /api/products/search?q=      - Search products");
    info!("   GET    /api/products/category/:c    - Products by category");
    info!("   GET    /api/products/user/my-products - Caller's products");
    info!("   GET    /api/products/:id            - Product details");
    info!("   PUT    /api/products/:id            - Update product");
    info!("   PATCH  /api/products/:id/status     - Mark Available / Sold");
    info!("   DELETE /api/products/:id            - Delete product");
    info!("   POST   /api/orders                  - Place order");
    info!("   GET    /api/orders/my-orders        - Caller's orders");
    info!("   GET    /api/orders/:id              - Order details");
    info!("   PATCH  /api/orders/:id/cancel       - Cancel order");
    info!("   GET    /api/status                  - System status");
    info!("   GET    /health                      - Health check");

    axum::serve(listener, app).await?;

    Ok(())
}
