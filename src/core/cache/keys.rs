//! Query keys and the mutation → invalidation dependency graph
//!
//! Every cached collection is addressed by a [`QueryKey`]. Each mutation
//! declares the keys it dirties in exactly one place ([`invalidated_keys`]);
//! call sites never re-derive the set by hand.

/// Address of one cached collection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Projects,
    Categories,
    SubCategories,
    Wings { project_id: String },
    Units { wing_id: String },
}

impl QueryKey {
    /// Stable storage key for the cache table
    pub fn storage_key(&self) -> String {
        match self {
            QueryKey::Projects => "projects".to_string(),
            QueryKey::Categories => "categories".to_string(),
            QueryKey::SubCategories => "subcategories".to_string(),
            QueryKey::Wings { project_id } => format!("wings:{}", project_id),
            QueryKey::Units { wing_id } => format!("units:{}", wing_id),
        }
    }

    /// Collection-named field a list payload may be wrapped under
    pub fn collection(&self) -> &'static str {
        match self {
            QueryKey::Projects => "projects",
            QueryKey::Categories => "categories",
            QueryKey::SubCategories => "subcategories",
            QueryKey::Wings { .. } => "wings",
            QueryKey::Units { .. } => "units",
        }
    }

    /// Endpoint path serving this collection
    pub fn path(&self) -> String {
        match self {
            QueryKey::Projects => "projects".to_string(),
            QueryKey::Categories => "categories".to_string(),
            QueryKey::SubCategories => "subcategories".to_string(),
            QueryKey::Wings { project_id } => format!("projects/{}/wings", project_id),
            QueryKey::Units { wing_id } => format!("wings/{}/units", wing_id),
        }
    }
}

/// A write that just went through, with enough context to name its fallout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Create/update/toggle on a project
    Project,
    /// Project removal also orphans its cached wings
    ProjectDelete { project_id: String },
    Category,
    SubCategory,
    /// Create/update on a wing of the given project
    Wing { project_id: String },
    /// Wing removal cascades over the wing's units
    WingDelete { project_id: String, wing_id: String },
    /// Any write to a unit of the given wing
    Unit { wing_id: String },
}

/// The declared invalidation set for a mutation.
///
/// Category writes also dirty the subcategory collection: renaming or
/// removing a category changes what its subcategories resolve to.
pub fn invalidated_keys(mutation: &Mutation) -> Vec<QueryKey> {
    match mutation {
        Mutation::Project => vec![QueryKey::Projects],
        Mutation::ProjectDelete { project_id } => vec![
            QueryKey::Projects,
            QueryKey::Wings {
                project_id: project_id.clone(),
            },
        ],
        Mutation::Category => vec![QueryKey::Categories, QueryKey::SubCategories],
        Mutation::SubCategory => vec![QueryKey::SubCategories],
        Mutation::Wing { project_id } => vec![QueryKey::Wings {
            project_id: project_id.clone(),
        }],
        Mutation::WingDelete {
            project_id,
            wing_id,
        } => vec![
            QueryKey::Wings {
                project_id: project_id.clone(),
            },
            QueryKey::Units {
                wing_id: wing_id.clone(),
            },
        ],
        Mutation::Unit { wing_id } => vec![QueryKey::Units {
            wing_id: wing_id.clone(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys_are_distinct_per_parent() {
        let a = QueryKey::Wings {
            project_id: "p1".into(),
        };
        let b = QueryKey::Wings {
            project_id: "p2".into(),
        };
        assert_ne!(a.storage_key(), b.storage_key());
    }

    #[test]
    fn test_wing_delete_cascades_to_units() {
        let keys = invalidated_keys(&Mutation::WingDelete {
            project_id: "p1".into(),
            wing_id: "w1".into(),
        });
        assert!(keys.contains(&QueryKey::Wings {
            project_id: "p1".into()
        }));
        assert!(keys.contains(&QueryKey::Units {
            wing_id: "w1".into()
        }));
    }

    #[test]
    fn test_category_write_dirties_subcategories() {
        let keys = invalidated_keys(&Mutation::Category);
        assert!(keys.contains(&QueryKey::Categories));
        assert!(keys.contains(&QueryKey::SubCategories));
    }

    #[test]
    fn test_unit_write_scoped_to_its_wing() {
        let keys = invalidated_keys(&Mutation::Unit {
            wing_id: "w9".into(),
        });
        assert_eq!(
            keys,
            vec![QueryKey::Units {
                wing_id: "w9".into()
            }]
        );
    }

    #[test]
    fn test_parent_scoped_paths() {
        assert_eq!(
            QueryKey::Wings {
                project_id: "p1".into()
            }
            .path(),
            "projects/p1/wings"
        );
        assert_eq!(
            QueryKey::Units {
                wing_id: "w1".into()
            }
            .path(),
            "wings/w1/units"
        );
    }
}
