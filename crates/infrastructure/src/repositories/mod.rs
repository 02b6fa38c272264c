pub mod sqlite_account_repository;
pub mod sqlite_order_repository;
pub mod sqlite_product_repository;

pub use sqlite_account_repository::SqliteAccountRepository;
pub use sqlite_order_repository::SqliteOrderRepository;
pub use sqlite_product_repository::SqliteProductRepository;
