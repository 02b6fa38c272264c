use super::{Account, Category, ObjectId};
use crate::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    New,
    Used,
    Refurbished,
}

impl Condition {
    pub const ALL: [Condition; 3] = [Condition::New, Condition::Used, Condition::Refurbished];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "New",
            Condition::Used => "Used",
            Condition::Refurbished => "Refurbished",
        }
    }

    pub fn valid_values() -> String {
        Self::ALL.iter().map(Condition::as_str).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|condition| condition.as_str() == s)
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "Invalid condition. Must be one of: {}",
                    Self::valid_values()
                ))
            })
    }
}

/// Availability of a listing. Sellers flip it by hand; orders never touch it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
    #[default]
    Available,
    Sold,
}

impl ProductStatus {
    pub const ALL: [ProductStatus; 2] = [ProductStatus::Available, ProductStatus::Sold];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Available => "Available",
            ProductStatus::Sold => "Sold",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                DomainError::validation("Invalid status. Must be one of: Available, Sold")
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub product_title: String,
    pub description: String,
    pub price: f64,
    pub quantity: i64,
    pub year_of_manufacture: String,
    pub model: String,
    pub brand: String,
    pub weight: f64,
    pub dimensions: Option<Dimensions>,
    pub material: String,
    pub color: String,
    pub original_packaging: bool,
    pub manual_included: bool,
    pub working_condition_description: String,
    pub condition: Condition,
    pub status: ProductStatus,
    pub category: Category,
    pub image: String,
    pub seller: ObjectId,
    /// Seller display name at listing time; later profile edits do not reach it.
    pub seller_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing fields that already passed the listing validator.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductListing {
    pub product_title: String,
    pub description: String,
    pub price: f64,
    pub quantity: i64,
    pub year_of_manufacture: String,
    pub model: String,
    pub brand: String,
    pub weight: f64,
    pub dimensions: Option<Dimensions>,
    pub material: String,
    pub color: String,
    pub original_packaging: bool,
    pub manual_included: bool,
    pub working_condition_description: String,
    pub condition: Condition,
    pub category: Category,
    pub image: String,
}

impl Product {
    /// New listing owned by `seller`, always starting out Available.
    pub fn list(listing: ProductListing, seller: &Account) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::generate(),
            product_title: listing.product_title,
            description: listing.description,
            price: listing.price,
            quantity: listing.quantity,
            year_of_manufacture: listing.year_of_manufacture,
            model: listing.model,
            brand: listing.brand,
            weight: listing.weight,
            dimensions: listing.dimensions,
            material: listing.material,
            color: listing.color,
            original_packaging: listing.original_packaging,
            manual_included: listing.manual_included,
            working_condition_description: listing.working_condition_description,
            condition: listing.condition,
            status: ProductStatus::Available,
            category: listing.category,
            image: listing.image,
            seller: seller.id.clone(),
            seller_name: seller.display_name.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, account: &Account) -> bool {
        self.seller == account.id
    }

    pub fn apply_changes(&mut self, changes: ProductChanges) {
        let ProductChanges {
            product_title,
            description,
            price,
            quantity,
            year_of_manufacture,
            model,
            brand,
            weight,
            dimensions,
            material,
            color,
            original_packaging,
            manual_included,
            working_condition_description,
            condition,
            status,
            category,
            image,
        } = changes;

        if let Some(v) = product_title {
            self.product_title = v;
        }
        if let Some(v) = description {
            self.description = v;
        }
        if let Some(v) = price {
            self.price = v;
        }
        if let Some(v) = quantity {
            self.quantity = v;
        }
        if let Some(v) = year_of_manufacture {
            self.year_of_manufacture = v;
        }
        if let Some(v) = model {
            self.model = v;
        }
        if let Some(v) = brand {
            self.brand = v;
        }
        if let Some(v) = weight {
            self.weight = v;
        }
        if let Some(v) = dimensions {
            self.dimensions = Some(v);
        }
        if let Some(v) = material {
            self.material = v;
        }
        if let Some(v) = color {
            self.color = v;
        }
        if let Some(v) = original_packaging {
            self.original_packaging = v;
        }
        if let Some(v) = manual_included {
            self.manual_included = v;
        }
        if let Some(v) = working_condition_description {
            self.working_condition_description = v;
        }
        if let Some(v) = condition {
            self.condition = v;
        }
        if let Some(v) = status {
            self.status = v;
        }
        if let Some(v) = category {
            self.category = v;
        }
        if let Some(v) = image {
            self.image = v;
        }

        self.updated_at = Utc::now();
    }
}

/// Accepts `"2019"` as well as `2019` for year fields.
pub(crate) fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "year_of_manufacture must be a string or number, got {other}"
        ))),
    }
}

/// Partial edit submitted by the owner of a listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    #[serde(default)]
    pub product_title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_year")]
    pub year_of_manufacture: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub original_packaging: Option<bool>,
    #[serde(default)]
    pub manual_included: Option<bool>,
    #[serde(default)]
    pub working_condition_description: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Typed counterpart of [`ProductUpdate`] once every field checked out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub product_title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub year_of_manufacture: Option<String>,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub weight: Option<f64>,
    pub dimensions: Option<Dimensions>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub original_packaging: Option<bool>,
    pub manual_included: Option<bool>,
    pub working_condition_description: Option<String>,
    pub condition: Option<Condition>,
    pub status: Option<ProductStatus>,
    pub category: Option<Category>,
    pub image: Option<String>,
}

impl ProductUpdate {
    /// Checks the submitted fields and converts them, reporting every problem at once.
    pub fn into_changes(self) -> Result<ProductChanges, DomainError> {
        let mut errors = Vec::new();

        let required_text = [
            ("product_title", &self.product_title),
            ("description", &self.description),
            ("year_of_manufacture", &self.year_of_manufacture),
            ("model", &self.model),
            ("brand", &self.brand),
            ("material", &self.material),
            ("color", &self.color),
            ("working_condition_description", &self.working_condition_description),
            ("image", &self.image),
        ];
        for (field, value) in required_text {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                errors.push(format!("{field} cannot be empty"));
            }
        }

        if self.price.is_some_and(|v| v < 0.0) {
            errors.push("price must be non-negative".to_string());
        }
        if self.quantity.is_some_and(|v| v < 0) {
            errors.push("quantity must be non-negative".to_string());
        }
        if self.weight.is_some_and(|v| v < 0.0) {
            errors.push("weight must be non-negative".to_string());
        }

        let condition = parse_optional::<Condition>(self.condition.as_deref(), &mut errors);
        let status = parse_optional::<ProductStatus>(self.status.as_deref(), &mut errors);
        let category = parse_optional::<Category>(self.category.as_deref(), &mut errors);

        if !errors.is_empty() {
            return Err(DomainError::ValidationError(errors.join("; ")));
        }

        Ok(ProductChanges {
            product_title: self.product_title,
            description: self.description,
            price: self.price,
            quantity: self.quantity,
            year_of_manufacture: self.year_of_manufacture,
            model: self.model,
            brand: self.brand,
            weight: self.weight,
            dimensions: self.dimensions,
            material: self.material,
            color: self.color,
            original_packaging: self.original_packaging,
            manual_included: self.manual_included,
            working_condition_description: self.working_condition_description,
            condition,
            status,
            category,
            image: self.image,
        })
    }
}

fn parse_optional<T>(raw: Option<&str>, errors: &mut Vec<String>) -> Option<T>
where
    T: FromStr<Err = DomainError>,
{
    match raw.map(str::parse::<T>) {
        Some(Ok(value)) => Some(value),
        Some(Err(err)) => {
            errors.push(err.public_message());
            None
        }
        None => None,
    }
}

/// Conditions a product must meet to show up in a catalog query.
/// Unset fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category: Option<Category>,
    pub status: Option<ProductStatus>,
    pub condition: Option<Condition>,
    /// Case-insensitive substring of the brand.
    pub brand: Option<String>,
    /// Case-insensitive substring of the color.
    pub color: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Case-insensitive substring of title, description, brand or model.
    pub text: Option<String>,
    pub seller: Option<ObjectId>,
}

impl ProductFilter {
    pub fn category(category: Category) -> Self {
        Self { category: Some(category), ..Self::default() }
    }

    pub fn text(query: impl Into<String>) -> Self {
        Self { text: Some(query.into()), ..Self::default() }
    }

    pub fn seller(seller: ObjectId) -> Self {
        Self { seller: Some(seller), ..Self::default() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-indexed.
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_LIMIT: u64 = 10;

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Rows to skip, or `None` when the page lies beyond what storage can address.
    pub fn checked_offset(&self) -> Option<u64> {
        self.page
            .saturating_sub(1)
            .checked_mul(self.limit)
            .filter(|offset| i64::try_from(*offset).is_ok())
    }

    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: Self::DEFAULT_PAGE, limit: Self::DEFAULT_LIMIT }
    }
}

/// Raw query string of the product listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub condition: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<String>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<String>,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ProductListQuery {
    pub fn into_parts(self) -> Result<(ProductFilter, PageRequest), DomainError> {
        let filter = ProductFilter {
            category: non_empty(self.category).map(|v| v.parse()).transpose()?,
            status: non_empty(self.status).map(|v| v.parse()).transpose()?,
            condition: non_empty(self.condition).map(|v| v.parse()).transpose()?,
            brand: non_empty(self.brand),
            color: non_empty(self.color),
            min_price: parse_price("minPrice", self.min_price)?,
            max_price: parse_price("maxPrice", self.max_price)?,
            text: None,
            seller: None,
        };

        let page = PageRequest {
            page: parse_positive("page", self.page)?.unwrap_or(PageRequest::DEFAULT_PAGE),
            limit: parse_positive("limit", self.limit)?.unwrap_or(PageRequest::DEFAULT_LIMIT),
        };
        if page.checked_offset().is_none() {
            return Err(DomainError::validation("page is out of range"));
        }

        Ok((filter, page))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_price(name: &str, raw: Option<String>) -> Result<Option<f64>, DomainError> {
    non_empty(raw)
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite())
                .ok_or_else(|| DomainError::validation(format!("{name} must be a number")))
        })
        .transpose()
}

fn parse_positive(name: &str, raw: Option<String>) -> Result<Option<u64>, DomainError> {
    non_empty(raw)
        .map(|v| {
            v.trim()
                .parse::<u64>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| DomainError::validation(format!("{name} must be a positive integer")))
        })
        .transpose()
}

/// One page of catalog results plus the numbers needed to page through the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}
