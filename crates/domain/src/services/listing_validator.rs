use crate::entities::product::deserialize_year;
use crate::entities::{Category, Condition, Dimensions, ProductListing};
use crate::errors::DomainError;
use serde::Deserialize;

/// Product form as posted by a seller. Seller fields are not part of the
/// shape: ownership always comes from the authenticated account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductSubmission {
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
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

fn text_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Checks a submission and returns every problem found, in a fixed order:
/// required fields, then numeric ranges, then enumerations. An empty list
/// means the submission is acceptable.
pub fn validate_listing(submission: &ProductSubmission) -> Vec<String> {
    let mut errors = Vec::new();

    let required = [
        ("product_title", text_present(&submission.product_title)),
        ("description", text_present(&submission.description)),
        ("price", submission.price.is_some()),
        ("quantity", submission.quantity.is_some()),
        ("year_of_manufacture", text_present(&submission.year_of_manufacture)),
        ("model", text_present(&submission.model)),
        ("brand", text_present(&submission.brand)),
        ("weight", submission.weight.is_some()),
        ("material", text_present(&submission.material)),
        ("color", text_present(&submission.color)),
        ("working_condition_description", text_present(&submission.working_condition_description)),
        ("condition", text_present(&submission.condition)),
        ("category", text_present(&submission.category)),
        ("image", text_present(&submission.image)),
    ];
    for (field, present) in required {
        if !present {
            errors.push(format!("{field} is required"));
        }
    }

    let ranges = [
        ("price", submission.price.is_some_and(|v| v < 0.0 || v.is_nan())),
        ("quantity", submission.quantity.is_some_and(|v| v < 0)),
        ("weight", submission.weight.is_some_and(|v| v < 0.0 || v.is_nan())),
    ];
    for (field, negative) in ranges {
        if negative {
            errors.push(format!("{field} must be non-negative"));
        }
    }

    if let Some(condition) = submission.condition.as_deref().filter(|v| !v.trim().is_empty()) {
        if condition.parse::<Condition>().is_err() {
            errors.push(format!("condition must be one of: {}", Condition::valid_values()));
        }
    }
    if let Some(category) = submission.category.as_deref().filter(|v| !v.trim().is_empty()) {
        if category.parse::<Category>().is_err() {
            errors.push(format!("category must be one of: {}", Category::valid_values()));
        }
    }

    errors
}

impl ProductSubmission {
    /// Runs [`validate_listing`] and, when it passes, produces the typed listing.
    pub fn into_listing(self) -> Result<ProductListing, DomainError> {
        let errors = validate_listing(&self);
        if !errors.is_empty() {
            return Err(DomainError::InvalidListing(errors));
        }

        let missing = |field: &str| DomainError::InvalidListing(vec![format!("{field} is required")]);

        Ok(ProductListing {
            product_title: self.product_title.ok_or_else(|| missing("product_title"))?,
            description: self.description.ok_or_else(|| missing("description"))?,
            price: self.price.ok_or_else(|| missing("price"))?,
            quantity: self.quantity.ok_or_else(|| missing("quantity"))?,
            year_of_manufacture: self
                .year_of_manufacture
                .ok_or_else(|| missing("year_of_manufacture"))?,
            model: self.model.ok_or_else(|| missing("model"))?,
            brand: self.brand.ok_or_else(|| missing("brand"))?,
            weight: self.weight.ok_or_else(|| missing("weight"))?,
            dimensions: self.dimensions,
            material: self.material.ok_or_else(|| missing("material"))?,
            color: self.color.ok_or_else(|| missing("color"))?,
            original_packaging: self.original_packaging.unwrap_or(false),
            manual_included: self.manual_included.unwrap_or(false),
            working_condition_description: self
                .working_condition_description
                .ok_or_else(|| missing("working_condition_description"))?,
            condition: self.condition.as_deref().unwrap_or_default().parse()?,
            category: self.category.as_deref().unwrap_or_default().parse()?,
            image: self.image.ok_or_else(|| missing("image"))?,
        })
    }
}
