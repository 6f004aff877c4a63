//! Read-through / write-through store over the gateway and query cache
//!
//! Reads serve from a fresh cache entry or fetch, normalize, and fill the
//! cache. Writes go straight to the remote; on success the mutation's
//! declared invalidation set is applied so dependent reads refetch. A failed
//! write leaves the cache untouched.

use miette::{IntoDiagnostic, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::core::cache::{Mutation, QueryCache, QueryKey};
use crate::entities::{Category, Project, SubCategory, Unit, Wing};
use crate::remote::envelope::decode_list;
use crate::remote::{Credential, Gateway};

pub struct InventoryStore<'a> {
    gateway: &'a dyn Gateway,
    cache: QueryCache,
    credential: Option<Credential>,
}

impl<'a> InventoryStore<'a> {
    pub fn new(gateway: &'a dyn Gateway, cache: QueryCache, credential: Option<Credential>) -> Self {
        Self {
            gateway,
            cache,
            credential,
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    // ---- reads -----------------------------------------------------------

    pub fn projects(&mut self, force: bool) -> Result<Vec<Project>> {
        self.list(QueryKey::Projects, force)
    }

    pub fn categories(&mut self, force: bool) -> Result<Vec<Category>> {
        self.list(QueryKey::Categories, force)
    }

    pub fn subcategories(&mut self, force: bool) -> Result<Vec<SubCategory>> {
        self.list(QueryKey::SubCategories, force)
    }

    pub fn wings(&mut self, project_id: &str, force: bool) -> Result<Vec<Wing>> {
        self.list(
            QueryKey::Wings {
                project_id: project_id.to_string(),
            },
            force,
        )
    }

    pub fn units(&mut self, wing_id: &str, force: bool) -> Result<Vec<Unit>> {
        self.list(
            QueryKey::Units {
                wing_id: wing_id.to_string(),
            },
            force,
        )
    }

    fn list<T: DeserializeOwned>(&mut self, key: QueryKey, force: bool) -> Result<Vec<T>> {
        if !force {
            if let Some(entry) = self.cache.get(&key)? {
                if entry.is_fresh() {
                    return Ok(decode_list(entry.payload, key.collection())?);
                }
            }
        }

        let payload = self.gateway.get(&key.path(), self.credential.as_ref())?;
        let items = decode_list(payload.clone(), key.collection())?;
        self.cache.put(&key, &payload)?;
        Ok(items)
    }

    // ---- writes ----------------------------------------------------------

    pub fn create<B: Serialize>(&mut self, path: &str, body: &B, mutation: Mutation) -> Result<Value> {
        let body = serde_json::to_value(body).into_diagnostic()?;
        let payload = self.gateway.post(path, &body, self.credential.as_ref())?;
        self.cache.apply_mutation(&mutation)?;
        Ok(payload)
    }

    pub fn update<B: Serialize>(&mut self, path: &str, body: &B, mutation: Mutation) -> Result<Value> {
        let body = serde_json::to_value(body).into_diagnostic()?;
        let payload = self.gateway.put(path, &body, self.credential.as_ref())?;
        self.cache.apply_mutation(&mutation)?;
        Ok(payload)
    }

    pub fn remove(&mut self, path: &str, mutation: Mutation) -> Result<Value> {
        let payload = self.gateway.delete(path, self.credential.as_ref())?;
        self.cache.apply_mutation(&mutation)?;
        Ok(payload)
    }

    // ---- lookups ---------------------------------------------------------

    pub fn find_project(&mut self, query: &str) -> Result<Project> {
        let projects = self.projects(false)?;
        pick("project", query, projects, |p| (&p.id, &p.name))
    }

    pub fn find_category(&mut self, query: &str) -> Result<Category> {
        let categories = self.categories(false)?;
        pick("category", query, categories, |c| (&c.id, &c.name))
    }

    pub fn find_subcategory(&mut self, query: &str) -> Result<SubCategory> {
        let subcategories = self.subcategories(false)?;
        pick("subcategory", query, subcategories, |s| (&s.id, &s.name))
    }

    pub fn find_wing(&mut self, project_id: &str, query: &str) -> Result<Wing> {
        let wings = self.wings(project_id, false)?;
        pick("wing", query, wings, |w| (&w.id, &w.name))
    }

    pub fn find_unit(&mut self, wing_id: &str, query: &str) -> Result<Unit> {
        let units = self.units(wing_id, false)?;
        pick("unit", query, units, |u| (&u.id, &u.name))
    }
}

/// Resolve a user-supplied id-or-name query against a collection.
///
/// Exact id wins outright; otherwise case-insensitive substring match on the
/// name. Zero matches and ambiguous matches are both hard errors, the latter
/// listing the candidates.
fn pick<T>(
    what: &'static str,
    query: &str,
    items: Vec<T>,
    fields: impl Fn(&T) -> (&String, &String),
) -> Result<T> {
    if let Some(idx) = items.iter().position(|item| fields(item).0 == query) {
        let mut items = items;
        return Ok(items.swap_remove(idx));
    }

    let q = query.to_lowercase();
    let mut matches: Vec<T> = items
        .into_iter()
        .filter(|item| fields(item).1.to_lowercase().contains(&q))
        .collect();

    match matches.len() {
        0 => Err(crate::remote::ApiError::NotFound(what, query.to_string()).into()),
        1 => Ok(matches.remove(0)),
        _ => {
            let names: Vec<String> = matches
                .iter()
                .map(|item| {
                    let (id, name) = fields(item);
                    format!("{} ({})", name, id)
                })
                .collect();
            Err(miette::miette!(
                "ambiguous {} '{}': matches {}",
                what,
                query,
                names.join(", ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::ApiError;
    use serde_json::json;
    use std::cell::RefCell;

    /// In-memory gateway: one mutable "remote" projects table plus a counter
    /// of list fetches, to observe cache hits vs refetches.
    struct FakeGateway {
        projects: RefCell<Vec<Value>>,
        gets: RefCell<u32>,
    }

    impl FakeGateway {
        fn new() -> Self {
            Self {
                projects: RefCell::new(Vec::new()),
                gets: RefCell::new(0),
            }
        }
    }

    impl Gateway for FakeGateway {
        fn get(&self, path: &str, _cred: Option<&Credential>) -> Result<Value, ApiError> {
            *self.gets.borrow_mut() += 1;
            match path {
                "projects" => Ok(json!({ "data": self.projects.borrow().clone() })),
                _ => Ok(Value::Array(Vec::new())),
            }
        }

        fn post(
            &self,
            path: &str,
            body: &Value,
            _cred: Option<&Credential>,
        ) -> Result<Value, ApiError> {
            assert_eq!(path, "projects");
            let mut record = body.clone();
            let id = format!("p{}", self.projects.borrow().len() + 1);
            record["id"] = json!(id);
            self.projects.borrow_mut().push(record.clone());
            Ok(record)
        }

        fn put(&self, _: &str, body: &Value, _: Option<&Credential>) -> Result<Value, ApiError> {
            Ok(body.clone())
        }

        fn delete(&self, _: &str, _: Option<&Credential>) -> Result<Value, ApiError> {
            Ok(Value::Null)
        }
    }

    fn project_body(name: &str) -> Value {
        json!({
            "name": name,
            "developer": "Meridian Builders",
            "reraNumber": "P1",
            "isActive": true
        })
    }

    #[test]
    fn test_fresh_cache_serves_without_refetch() {
        let gateway = FakeGateway::new();
        gateway.projects.borrow_mut().push({
            let mut p = project_body("Sky Gardens");
            p["id"] = json!("p1");
            p
        });

        let mut store =
            InventoryStore::new(&gateway, QueryCache::in_memory().unwrap(), None);

        assert_eq!(store.projects(false).unwrap().len(), 1);
        assert_eq!(store.projects(false).unwrap().len(), 1);
        assert_eq!(*gateway.gets.borrow(), 1, "second read must hit the cache");
    }

    #[test]
    fn test_create_then_list_contains_new_project_exactly_once() {
        let gateway = FakeGateway::new();
        let mut store =
            InventoryStore::new(&gateway, QueryCache::in_memory().unwrap(), None);

        // Warm the cache with the empty list.
        assert!(store.projects(false).unwrap().is_empty());

        store
            .create("projects", &project_body("Sky Gardens"), Mutation::Project)
            .unwrap();

        // The create invalidated the key, so this read refetches.
        let projects = store.projects(false).unwrap();
        let hits = projects
            .iter()
            .filter(|p| p.name == "Sky Gardens")
            .count();
        assert_eq!(hits, 1);
        assert_eq!(*gateway.gets.borrow(), 2);
    }

    #[test]
    fn test_force_bypasses_fresh_cache() {
        let gateway = FakeGateway::new();
        let mut store =
            InventoryStore::new(&gateway, QueryCache::in_memory().unwrap(), None);

        store.projects(false).unwrap();
        store.projects(true).unwrap();
        assert_eq!(*gateway.gets.borrow(), 2);
    }

    #[test]
    fn test_pick_by_id_name_and_ambiguity() {
        let gateway = FakeGateway::new();
        for name in ["Sky Gardens", "Sky Towers", "Harbour View"] {
            gateway.projects.borrow_mut().push({
                let mut p = project_body(name);
                p["id"] = json!(format!("id-{}", name.to_lowercase().replace(' ', "-")));
                p
            });
        }
        let mut store =
            InventoryStore::new(&gateway, QueryCache::in_memory().unwrap(), None);

        assert_eq!(store.find_project("id-harbour-view").unwrap().name, "Harbour View");
        assert_eq!(store.find_project("harbour").unwrap().name, "Harbour View");
        assert!(store.find_project("sky").is_err());
        assert!(store.find_project("nonesuch").is_err());
    }
}
