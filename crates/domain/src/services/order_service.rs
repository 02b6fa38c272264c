use crate::entities::{
    Account, AccountSummary, ObjectId, Order, OrderStatus, PlaceOrderRequest, PopulatedOrder,
    Product,
};
use crate::errors::DomainError;
use crate::repositories::{AccountRepository, OrderRepository, ProductRepository};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Order workflow - checkout, order history and cancellation.
pub struct OrderService {
    order_repository: Arc<dyn OrderRepository>,
    product_repository: Arc<dyn ProductRepository>,
    account_repository: Arc<dyn AccountRepository>,
}

fn order_id(raw: &str) -> Result<ObjectId, DomainError> {
    ObjectId::parse(raw)
        .ok_or_else(|| DomainError::InvalidIdentifier("Invalid order ID format".to_string()))
}

fn order_not_found() -> DomainError {
    DomainError::not_found("Order not found")
}

impl OrderService {
    pub fn new(
        order_repository: Arc<dyn OrderRepository>,
        product_repository: Arc<dyn ProductRepository>,
        account_repository: Arc<dyn AccountRepository>,
    ) -> Self {
        Self {
            order_repository,
            product_repository,
            account_repository,
        }
    }

    pub async fn place_order(
        &self,
        buyer: &Account,
        request: PlaceOrderRequest,
    ) -> Result<Order, DomainError> {
        let order = request.into_order(buyer)?;
        let saved = self.order_repository.insert(&order).await?;

        info!(
            order_id = %saved.id,
            buyer = %buyer.id,
            items = saved.items.len(),
            total = saved.total_amount,
            "order placed"
        );
        Ok(saved)
    }

    /// The caller's orders, newest first, with product references expanded.
    pub async fn my_orders(&self, buyer: &Account) -> Result<Vec<PopulatedOrder>, DomainError> {
        let orders = self.order_repository.find_by_buyer(&buyer.id).await?;

        let ids: BTreeSet<ObjectId> = orders
            .iter()
            .flat_map(|o| o.items.iter().map(|line| line.product_id.clone()))
            .collect();
        let ids: Vec<ObjectId> = ids.into_iter().collect();
        let products = self.product_repository.find_by_ids(&ids).await?;

        Ok(orders
            .into_iter()
            .map(|order| PopulatedOrder {
                products: referenced(&order, &products),
                order,
                buyer_profile: None,
            })
            .collect())
    }

    /// Loads an order the caller placed.
    async fn owned_order(
        &self,
        id: &str,
        caller: &Account,
        denied: &str,
    ) -> Result<Order, DomainError> {
        let id = order_id(id)?;
        let order = self
            .order_repository
            .find_by_id(&id)
            .await?
            .ok_or_else(order_not_found)?;

        if !order.is_placed_by(caller) {
            warn!(order_id = %order.id, caller = %caller.id, "order access denied");
            return Err(DomainError::forbidden(denied));
        }
        Ok(order)
    }

    pub async fn order_for(&self, id: &str, caller: &Account) -> Result<PopulatedOrder, DomainError> {
        let order = self
            .owned_order(id, caller, "Unauthorized: You can only view your own orders")
            .await?;

        let ids: Vec<ObjectId> = order.items.iter().map(|l| l.product_id.clone()).collect();
        let products = self.product_repository.find_by_ids(&ids).await?;
        let buyer_profile = self
            .account_repository
            .find_by_id(&order.buyer)
            .await?
            .as_ref()
            .map(AccountSummary::from);

        Ok(PopulatedOrder {
            products: referenced(&order, &products),
            order,
            buyer_profile,
        })
    }

    /// Cancels a Pending or Confirmed order.
    ///
    /// The status check is repeated by the store as a compare-and-set, so of
    /// two racing cancellations only one succeeds.
    pub async fn cancel(&self, id: &str, caller: &Account) -> Result<Order, DomainError> {
        let order = self
            .owned_order(id, caller, "Unauthorized: You can only cancel your own orders")
            .await?;

        if !order.status.is_cancellable() {
            return Err(cannot_cancel(order.status));
        }

        let changed = self
            .order_repository
            .transition_status(&order.id, &OrderStatus::CANCELLABLE, OrderStatus::Cancelled)
            .await?;

        let current = self
            .order_repository
            .find_by_id(&order.id)
            .await?
            .ok_or_else(order_not_found)?;

        if !changed {
            return Err(cannot_cancel(current.status));
        }

        info!(order_id = %current.id, "order cancelled");
        Ok(current)
    }
}

fn cannot_cancel(status: OrderStatus) -> DomainError {
    DomainError::validation(format!("Cannot cancel order with status: {status}"))
}

/// Live products behind the order's lines, in line order, skipping deleted ones.
fn referenced(order: &Order, products: &[Product]) -> Vec<Product> {
    let mut seen = BTreeSet::new();
    order
        .items
        .iter()
        .filter(|line| seen.insert(line.product_id.clone()))
        .filter_map(|line| products.iter().find(|p| p.id == line.product_id).cloned())
        .collect()
}
