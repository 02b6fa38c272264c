use crate::entities::{ObjectId, Order, OrderStatus};
use crate::errors::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Stores the order and all of its lines atomically.
    async fn insert(&self, order: &Order) -> Result<Order, DomainError>;
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Order>, DomainError>;
    /// Newest order date first.
    async fn find_by_buyer(&self, buyer: &ObjectId) -> Result<Vec<Order>, DomainError>;
    /// Compare-and-set on the status column: moves the order to `to` only if
    /// its current status is one of `from`. Returns whether a row changed.
    async fn transition_status(
        &self,
        id: &ObjectId,
        from: &[OrderStatus],
        to: OrderStatus,
    ) -> Result<bool, DomainError>;
}
