//! Wing (tower) record - a structural subdivision of a project

use serde::{Deserialize, Serialize};

/// A wing or tower within a project. Owns zero or more units, partitioned by
/// floor label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wing {
    #[serde(alias = "_id")]
    pub id: String,

    pub name: String,

    /// Number of floors in the wing
    pub total_floors: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "isActive", default = "default_active")]
    pub active: bool,

    /// Owning project
    pub project_id: String,
}

fn default_active() -> bool {
    true
}
