use application::MarketplaceApp;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub marketplace: Arc<MarketplaceApp>,
}
