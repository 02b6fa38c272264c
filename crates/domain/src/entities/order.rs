use super::{Account, AccountSummary, ObjectId, Product};
use crate::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order lifecycle: `Pending -> Confirmed -> Shipped -> Delivered`, with
/// `Cancelled` reachable from `Pending` or `Confirmed` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// States an order may be cancelled from.
    pub const CANCELLABLE: [OrderStatus; 2] = [OrderStatus::Pending, OrderStatus::Confirmed];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (*self, next),
            (OrderStatus::Pending, OrderStatus::Confirmed)
                | (OrderStatus::Confirmed, OrderStatus::Shipped)
                | (OrderStatus::Shipped, OrderStatus::Delivered)
                | (OrderStatus::Pending | OrderStatus::Confirmed, OrderStatus::Cancelled)
        )
    }

    pub fn is_cancellable(&self) -> bool {
        self.can_transition_to(OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Unknown order status: {s}")))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Completed => "Completed",
            PaymentStatus::Failed => "Failed",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(PaymentStatus::Pending),
            "Completed" => Ok(PaymentStatus::Completed),
            "Failed" => Ok(PaymentStatus::Failed),
            other => Err(DomainError::validation(format!("Unknown payment status: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: Option<String>,
}

/// One purchased line. Everything except `product_id` is a snapshot taken at
/// checkout and is not refreshed when the product changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ObjectId,
    pub product_title: Option<String>,
    pub price: Option<f64>,
    pub quantity: i64,
    pub category: Option<String>,
    pub seller_id: Option<ObjectId>,
    pub seller_name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub buyer: ObjectId,
    /// Buyer display name at checkout.
    pub buyer_name: String,
    pub items: Vec<OrderLine>,
    pub total_amount: f64,
    pub address: Address,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub order_date: DateTime<Utc>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn is_placed_by(&self, account: &Account) -> bool {
        self.buyer == account.id
    }
}

/// Cart line as submitted by the client. The product reference may arrive as
/// `_id` or `product_id`, the seller as `seller` or `seller_id`; the first
/// of each pair wins when both are sent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderItemInput {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub product_title: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub seller: Option<String>,
    #[serde(default)]
    pub seller_id: Option<String>,
    #[serde(default)]
    pub seller_name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressInput {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceOrderRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<OrderItemInput>,
    #[serde(default)]
    pub address: Option<AddressInput>,
    #[serde(default)]
    pub total_amount: Option<f64>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<OrderItemInput>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<OrderItemInput>>::deserialize(deserializer)?.unwrap_or_default())
}

impl PlaceOrderRequest {
    /// Builds the order for `buyer`.
    ///
    /// Prices and totals are taken as submitted. Payment is recorded as
    /// completed and the order starts out confirmed.
    pub fn into_order(self, buyer: &Account) -> Result<Order, DomainError> {
        if self.items.is_empty() {
            return Err(DomainError::validation("Order must contain at least one item"));
        }

        let address = self
            .address
            .and_then(AddressInput::complete)
            .ok_or_else(|| DomainError::validation("Complete address is required"))?;

        let total_amount = match self.total_amount {
            Some(total) if total.is_finite() && total > 0.0 => total,
            _ => return Err(DomainError::validation("Valid total amount is required")),
        };

        let items = self
            .items
            .into_iter()
            .map(OrderItemInput::into_line)
            .collect::<Result<Vec<_>, _>>()?;

        let now = Utc::now();
        Ok(Order {
            id: ObjectId::generate(),
            buyer: buyer.id.clone(),
            buyer_name: buyer.display_name.clone(),
            items,
            total_amount,
            address,
            status: OrderStatus::Confirmed,
            payment_status: PaymentStatus::Completed,
            order_date: now,
            delivery_date: None,
            created_at: now,
            updated_at: now,
        })
    }
}

impl AddressInput {
    fn complete(self) -> Option<Address> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Some(Address {
            street: present(self.street)?,
            city: present(self.city)?,
            state: present(self.state)?,
            postal_code: present(self.postal_code)?,
            country: self.country,
        })
    }
}

impl OrderItemInput {
    fn into_line(self) -> Result<OrderLine, DomainError> {
        let product_id = self
            .id
            .or(self.product_id)
            .as_deref()
            .and_then(ObjectId::parse)
            .ok_or_else(|| DomainError::validation("Each item needs a valid product reference"))?;

        let seller_id = match self.seller.or(self.seller_id).as_deref() {
            None | Some("") => None,
            Some(raw) => Some(ObjectId::parse(raw).ok_or_else(|| {
                DomainError::validation("Item seller reference is not a valid identifier")
            })?),
        };

        let quantity = match self.quantity {
            None | Some(0) => 1,
            Some(q) if q > 0 => q,
            Some(_) => return Err(DomainError::validation("Item quantity must be positive")),
        };

        Ok(OrderLine {
            product_id,
            product_title: self.product_title,
            price: self.price,
            quantity,
            category: self.category,
            seller_id,
            seller_name: self.seller_name,
            image: self.image,
        })
    }
}

/// Order with its references expanded for display.
///
/// `products` holds the live records behind the order lines that still
/// exist; `buyer_profile` is only filled in for single-order lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulatedOrder {
    #[serde(flatten)]
    pub order: Order,
    pub products: Vec<Product>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_profile: Option<AccountSummary>,
}
