//! In-memory ports for service tests.

use crate::entities::*;
use crate::errors::DomainError;
use crate::repositories::{AccountRepository, OrderRepository, ProductRepository};
use crate::security::{CredentialService, PasswordHasher};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

pub fn account(name: &str) -> Account {
    let now = Utc::now();
    Account {
        id: ObjectId::generate(),
        email: format!("{}@example.com", name.to_lowercase()),
        display_name: name.to_string(),
        profile_pic: None,
        bio: None,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
pub struct InMemoryAccounts {
    rows: Mutex<Vec<StoredAccount>>,
}

impl InMemoryAccounts {
    pub fn with(accounts: &[&Account]) -> Self {
        let rows = accounts
            .iter()
            .map(|a| StoredAccount { account: (*a).clone(), password_hash: String::new() })
            .collect();
        Self { rows: Mutex::new(rows) }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccounts {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Account>, DomainError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| &r.account.id == id).map(|r| r.account.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredAccount>, DomainError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.account.email == email).cloned())
    }

    async fn insert(&self, account: &StoredAccount) -> Result<Account, DomainError> {
        self.rows.lock().unwrap().push(account.clone());
        Ok(account.account.clone())
    }

    async fn update_profile(
        &self,
        id: &ObjectId,
        update: &ProfileUpdate,
    ) -> Result<Option<Account>, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|r| &r.account.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &update.display_name {
            row.account.display_name = name.clone();
        }
        if let Some(pic) = &update.profile_pic {
            row.account.profile_pic = Some(pic.clone());
        }
        if let Some(bio) = &update.bio {
            row.account.bio = Some(bio.clone());
        }
        Ok(Some(row.account.clone()))
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches(filter: &ProductFilter, p: &Product) -> bool {
    filter.category.map_or(true, |c| p.category == c)
        && filter.status.map_or(true, |s| p.status == s)
        && filter.condition.map_or(true, |c| p.condition == c)
        && filter.brand.as_deref().map_or(true, |b| contains_ci(&p.brand, b))
        && filter.color.as_deref().map_or(true, |c| contains_ci(&p.color, c))
        && filter.min_price.map_or(true, |m| p.price >= m)
        && filter.max_price.map_or(true, |m| p.price <= m)
        && filter.seller.as_ref().map_or(true, |s| &p.seller == s)
        && filter.text.as_deref().map_or(true, |t| {
            contains_ci(&p.product_title, t)
                || contains_ci(&p.description, t)
                || contains_ci(&p.brand, t)
                || contains_ci(&p.model, t)
        })
}

/// Keeps rows in insertion order; reads return them newest first.
#[derive(Default)]
pub struct InMemoryProducts {
    rows: Mutex<Vec<Product>>,
}

#[async_trait]
impl ProductRepository for InMemoryProducts {
    async fn insert(&self, product: &Product) -> Result<Product, DomainError> {
        self.rows.lock().unwrap().push(product.clone());
        Ok(product.clone())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Product>, DomainError> {
        Ok(self.rows.lock().unwrap().iter().find(|p| &p.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Product>, DomainError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|p| ids.contains(&p.id)).cloned().collect())
    }

    async fn find_matching(
        &self,
        filter: &ProductFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<Product>, DomainError> {
        let rows = self.rows.lock().unwrap();
        let newest_first = rows.iter().rev().filter(|p| matches(filter, p)).cloned();
        Ok(match page {
            Some(page) => newest_first
                .skip(page.offset() as usize)
                .take(page.limit as usize)
                .collect(),
            None => newest_first.collect(),
        })
    }

    async fn count_matching(&self, filter: &ProductFilter) -> Result<u64, DomainError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|p| matches(filter, p)).count() as u64)
    }

    async fn update(
        &self,
        id: &ObjectId,
        seller: &ObjectId,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.iter_mut().find(|p| &p.id == id && &p.seller == seller).map(|row| {
            row.apply_changes(changes.clone());
            row.clone()
        }))
    }

    async fn set_status(
        &self,
        id: &ObjectId,
        seller: &ObjectId,
        status: ProductStatus,
    ) -> Result<Option<Product>, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.iter_mut().find(|p| &p.id == id && &p.seller == seller).map(|row| {
            row.status = status;
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn delete(&self, id: &ObjectId, seller: &ObjectId) -> Result<bool, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| !(&p.id == id && &p.seller == seller));
        Ok(rows.len() != before)
    }
}

#[derive(Default)]
pub struct InMemoryOrders {
    rows: Mutex<Vec<Order>>,
}

impl InMemoryOrders {
    pub fn force_status(&self, id: &ObjectId, status: OrderStatus) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|o| &o.id == id) {
            row.status = status;
        }
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrders {
    async fn insert(&self, order: &Order) -> Result<Order, DomainError> {
        self.rows.lock().unwrap().push(order.clone());
        Ok(order.clone())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Order>, DomainError> {
        Ok(self.rows.lock().unwrap().iter().find(|o| &o.id == id).cloned())
    }

    async fn find_by_buyer(&self, buyer: &ObjectId) -> Result<Vec<Order>, DomainError> {
        let rows = self.rows.lock().unwrap();
        let mut orders: Vec<Order> = rows.iter().filter(|o| &o.buyer == buyer).cloned().collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders)
    }

    async fn transition_status(
        &self,
        id: &ObjectId,
        from: &[OrderStatus],
        to: OrderStatus,
    ) -> Result<bool, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|o| &o.id == id && from.contains(&o.status)) {
            Some(row) => {
                row.status = to;
                row.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Tokens are `token:<account id>`.
pub struct PlainCredentials;

impl CredentialService for PlainCredentials {
    fn issue(&self, account: &ObjectId) -> Result<String, DomainError> {
        Ok(format!("token:{account}"))
    }

    fn verify(&self, token: &str) -> Result<ObjectId, DomainError> {
        token
            .strip_prefix("token:")
            .and_then(ObjectId::parse)
            .ok_or_else(|| DomainError::unauthenticated("invalid token"))
    }
}

pub struct ReversibleHasher;

#[async_trait]
impl PasswordHasher for ReversibleHasher {
    async fn hash(&self, password: &str) -> Result<String, DomainError> {
        Ok(format!("hashed:{password}"))
    }

    async fn verify(&self, password: &str, password_hash: &str) -> Result<bool, DomainError> {
        Ok(password_hash == format!("hashed:{password}"))
    }
}
