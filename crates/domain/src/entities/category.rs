use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Furniture,
    Clothes,
    Electronics,
    Beddings,
    Wearables,
    #[serde(rename = "Home Decor")]
    HomeDecor,
    #[serde(rename = "Study Material")]
    StudyMaterial,
    #[serde(rename = "Kitchen Appliances")]
    KitchenAppliances,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Furniture,
        Category::Clothes,
        Category::Electronics,
        Category::Beddings,
        Category::Wearables,
        Category::HomeDecor,
        Category::StudyMaterial,
        Category::KitchenAppliances,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Furniture => "Furniture",
            Category::Clothes => "Clothes",
            Category::Electronics => "Electronics",
            Category::Beddings => "Beddings",
            Category::Wearables => "Wearables",
            Category::HomeDecor => "Home Decor",
            Category::StudyMaterial => "Study Material",
            Category::KitchenAppliances => "Kitchen Appliances",
        }
    }

    /// Comma separated list used in error messages.
    pub fn valid_values() -> String {
        Self::ALL.iter().map(Category::as_str).collect::<Vec<_>>().join(", ")
    }

    /// Resolves a URL path token such as `kitchen_appliances` or `electronics`.
    pub fn from_path_segment(segment: &str) -> Result<Self, DomainError> {
        let normalized = segment
            .replace('_', " ")
            .split_whitespace()
            .map(title_case)
            .collect::<Vec<_>>()
            .join(" ");
        normalized.parse()
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "Invalid category. Must be one of: {}",
                    Self::valid_values()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("kitchen_appliances", Category::KitchenAppliances)]
    #[case("electronics", Category::Electronics)]
    #[case("home_decor", Category::HomeDecor)]
    #[case("Study Material", Category::StudyMaterial)]
    #[case("FURNITURE", Category::Furniture)]
    fn path_segments_normalise_to_categories(#[case] segment: &str, #[case] expected: Category) {
        assert_eq!(Category::from_path_segment(segment), Ok(expected));
    }

    #[rstest]
    #[case("toys")]
    #[case("")]
    #[case("kitchen")]
    fn unknown_path_segments_are_rejected(#[case] segment: &str) {
        let err = Category::from_path_segment(segment).expect_err("should be rejected");
        assert!(matches!(err, DomainError::ValidationError(msg) if msg.starts_with("Invalid category")));
    }

    #[test]
    fn parse_is_exact() {
        assert_eq!("Home Decor".parse::<Category>(), Ok(Category::HomeDecor));
        assert!("home decor".parse::<Category>().is_err());
    }

    #[test]
    fn serde_uses_display_names() {
        let json = serde_json::to_string(&Category::KitchenAppliances).expect("serialize");
        assert_eq!(json, "\"Kitchen Appliances\"");
    }
}
