use crate::entities::{ObjectId, PageRequest, Product, ProductChanges, ProductFilter, ProductStatus};
use crate::errors::DomainError;
use async_trait::async_trait;

/// Product store. Every multi-row read returns newest-created first.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, product: &Product) -> Result<Product, DomainError>;
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Product>, DomainError>;
    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Product>, DomainError>;
    /// `page: None` returns every match.
    async fn find_matching(
        &self,
        filter: &ProductFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<Product>, DomainError>;
    async fn count_matching(&self, filter: &ProductFilter) -> Result<u64, DomainError>;
    /// Writes only the fields set in `changes`, as one write conditional on
    /// `(id, seller)`; `None` when nothing matched.
    async fn update(
        &self,
        id: &ObjectId,
        seller: &ObjectId,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, DomainError>;
    /// Single conditional write on `(id, seller)`; `None` when nothing matched.
    async fn set_status(
        &self,
        id: &ObjectId,
        seller: &ObjectId,
        status: ProductStatus,
    ) -> Result<Option<Product>, DomainError>;
    /// Returns whether a row owned by `seller` was removed.
    async fn delete(&self, id: &ObjectId, seller: &ObjectId) -> Result<bool, DomainError>;
}
