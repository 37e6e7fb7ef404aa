//! Supplier (proveedor) profile and category.

use serde::{Deserialize, Serialize};

/// The supplier's price category.
///
/// Categories outside A-D are kept verbatim as [`Category::Unrecognized`] and
/// price at zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Category A.
    A,
    /// Category B.
    B,
    /// Category C.
    C,
    /// Category D.
    D,
    /// Any other category label.
    Unrecognized(String),
}

impl Category {
    /// Returns the category label.
    pub fn as_str(&self) -> &str {
        match self {
            Category::A => "A",
            Category::B => "B",
            Category::C => "C",
            Category::D => "D",
            Category::Unrecognized(label) => label,
        }
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        match label.as_str() {
            "A" => Category::A,
            "B" => Category::B,
            "C" => Category::C,
            "D" => Category::D,
            _ => Category::Unrecognized(label),
        }
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Category::from(label.to_string())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

/// A milk supplier as held by the supplier directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierProfile {
    /// Unique supplier code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Price category.
    pub category: Category,
    /// Whether the supplier is flagged for tax withholding in the directory.
    #[serde(default)]
    pub retention: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_categories_parse() {
        assert_eq!(Category::from("A"), Category::A);
        assert_eq!(Category::from("D"), Category::D);
    }

    #[test]
    fn test_unknown_category_is_kept_verbatim() {
        let category = Category::from("Z");
        assert_eq!(category, Category::Unrecognized("Z".to_string()));
        assert_eq!(category.as_str(), "Z");
    }

    #[test]
    fn test_lowercase_is_not_a_known_category() {
        assert!(matches!(Category::from("a"), Category::Unrecognized(_)));
    }

    #[test]
    fn test_supplier_profile_serde() {
        let profile: SupplierProfile =
            serde_json::from_str(r#"{"code":"01001","name":"Los Alamos","category":"B"}"#)
                .unwrap();
        assert_eq!(profile.category, Category::B);
        assert!(!profile.retention);

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["category"], "B");
    }
}
