use application::MarketplaceApp;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod error;
pub mod response;
pub mod routes;
pub mod state;

pub use state::AppState;

/// Full HTTP surface: `/api/products`, `/api/orders`, `/api/auth`, plus
/// `/api/status` and `/health`.
pub fn router(marketplace: Arc<MarketplaceApp>) -> Router {
    let app_state = AppState { marketplace };

    let api = Router::new()
        .nest("/products", routes::products::routes())
        .nest("/orders", routes::orders::routes())
        .nest("/auth", routes::auth::routes())
        .route("/status", get(routes::system::get_system_status));

    Router::new()
        .nest("/api", api)
        .route("/health", get(routes::system::health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
