pub mod account_repository;
pub mod order_repository;
pub mod product_repository;

pub use account_repository::AccountRepository;
pub use order_repository::OrderRepository;
pub use product_repository::ProductRepository;
