//! Category and SubCategory records
//!
//! Projects reference these; they are not owned by any project. A SubCategory
//! is only valid under its parent Category.

use serde::{Deserialize, Serialize};

/// A top-level project category (e.g. "Residential", "Commercial")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(alias = "_id")]
    pub id: String,

    pub name: String,
}

/// A subcategory scoped to a parent category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    #[serde(alias = "_id")]
    pub id: String,

    pub name: String,

    /// Parent category this subcategory belongs to
    pub category_id: String,
}

/// Subcategories selectable under the given category
pub fn allowed_subcategories<'a>(
    subcategories: &'a [SubCategory],
    category_id: &str,
) -> Vec<&'a SubCategory> {
    subcategories
        .iter()
        .filter(|s| s.category_id == category_id)
        .collect()
}

/// Check a chosen subcategory against the chosen category.
///
/// Returns the names of the valid alternatives when the pairing is wrong, so
/// the caller can show the user what is actually selectable.
pub fn validate_subcategory(
    subcategories: &[SubCategory],
    category_id: &str,
    subcategory_id: &str,
) -> Result<(), Vec<String>> {
    let allowed = allowed_subcategories(subcategories, category_id);
    if allowed.iter().any(|s| s.id == subcategory_id) {
        Ok(())
    } else {
        Err(allowed.iter().map(|s| s.name.clone()).collect())
    }
}
