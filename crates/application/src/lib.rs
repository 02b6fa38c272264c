use config::Config;
use domain::*;
use infrastructure::*;
use std::sync::Arc;

/// Marketplace application - wires storage and credentials into the domain services.
pub struct MarketplaceApp {
    pub catalog_service: CatalogService,
    pub order_service: OrderService,
    pub account_service: AccountService,
    pub auth_guard: AuthGuard,
}

impl MarketplaceApp {
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        // Infrastructure layer - database setup
        let database = Database::new(&config.database_path, config.database_pool_size)?;
        let pool = database.get_pool().clone();

        // Create repository implementations
        let account_repository: Arc<dyn AccountRepository> =
            Arc::new(SqliteAccountRepository::new(pool.clone()));
        let product_repository: Arc<dyn ProductRepository> =
            Arc::new(SqliteProductRepository::new(pool.clone()));
        let order_repository: Arc<dyn OrderRepository> =
            Arc::new(SqliteOrderRepository::new(pool));

        // Credentials
        let password_hasher: Arc<dyn PasswordHasher> =
            Arc::new(Pbkdf2PasswordHasher::new(config.password_hash_rounds));
        let credentials: Arc<dyn CredentialService> = Arc::new(HmacTokenService::new(
            config.jwt_secret.as_bytes(),
            chrono::Duration::hours(config.token_ttl_hours),
        ));

        // Domain services
        let catalog_service = CatalogService::new(product_repository.clone());

        let order_service = OrderService::new(
            order_repository,
            product_repository,
            account_repository.clone(),
        );

        let account_service = AccountService::new(
            account_repository.clone(),
            password_hasher,
            credentials.clone(),
        );

        let auth_guard = AuthGuard::new(account_repository, credentials);

        Ok(Self {
            catalog_service,
            order_service,
            account_service,
            auth_guard,
        })
    }
}
