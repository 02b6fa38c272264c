pub mod account_service;
pub mod auth_guard;
pub mod catalog_service;
pub mod listing_validator;
pub mod order_service;

pub use account_service::AccountService;
pub use auth_guard::{bearer_token, AuthGuard};
pub use catalog_service::CatalogService;
pub use listing_validator::{validate_listing, ProductSubmission};
pub use order_service::OrderService;
