//! Project record - the top of the inventory hierarchy

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A real-estate project. Owns zero or more wings; references a category and
/// optionally a subcategory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(alias = "_id")]
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Referenced category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,

    /// Referenced subcategory (must belong to `category_id`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category_id: Option<String>,

    /// Developer / builder name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub developer: String,

    /// Regulatory registration number (RERA)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rera_number: String,

    /// Expected or actual completion date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<NaiveDate>,

    #[serde(rename = "isActive", default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Project {
    /// Case-insensitive substring search over name, developer and RERA number
    pub fn matches_search(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q)
            || self.developer.to_lowercase().contains(&q)
            || self.rera_number.to_lowercase().contains(&q)
    }

    /// The record re-submitted by the "toggle active" shortcut: the full
    /// project with only the flag inverted.
    pub fn toggled(&self) -> Self {
        let mut next = self.clone();
        next.active = !next.active;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Project {
        Project {
            id: "p1".into(),
            name: "Sky Gardens".into(),
            description: Some("Premium towers by the lake".into()),
            category_id: Some("c1".into()),
            sub_category_id: Some("s1".into()),
            developer: "Meridian Builders".into(),
            rera_number: "P52100012345".into(),
            completion_date: NaiveDate::from_ymd_opt(2027, 6, 30),
            active: true,
        }
    }

    #[test]
    fn test_search_covers_name_developer_and_rera() {
        let p = fixture();
        assert!(p.matches_search("sky"));
        assert!(p.matches_search("meridian"));
        assert!(p.matches_search("52100012345"));
        assert!(!p.matches_search("harbour"));
    }

    #[test]
    fn test_toggle_inverts_only_the_flag() {
        let p = fixture();
        let toggled = p.toggled();
        assert!(!toggled.active);
        assert_eq!(toggled.name, p.name);
        assert_eq!(toggled.rera_number, p.rera_number);
        assert_eq!(toggled.toggled(), p);
    }

    #[test]
    fn test_camel_case_wire_shape() {
        let json = serde_json::to_value(fixture()).unwrap();
        assert!(json.get("reraNumber").is_some());
        assert!(json.get("isActive").is_some());
        assert!(json.get("completionDate").is_some());
    }
}
