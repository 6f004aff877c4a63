//! SQLite-backed query cache
//!
//! One row per collection key: the raw JSON payload as fetched, when it was
//! fetched, a staleness flag flipped by mutations, and a content digest for
//! the `vit cache info` view. The cache is rebuilt from scratch on schema
//! version mismatch; nothing in it is authoritative.

mod keys;

pub use keys::{invalidated_keys, Mutation, QueryKey};

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use miette::{IntoDiagnostic, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Cache entries older than this are refetched even when not marked stale
pub const FRESH_FOR: Duration = Duration::from_secs(300);

const SCHEMA_VERSION: i32 = 2;

const SCHEMA: &str = r#"
CREATE TABLE schema_version (version INTEGER NOT NULL);

CREATE TABLE queries (
    key        TEXT PRIMARY KEY,
    payload    TEXT NOT NULL,
    digest     TEXT NOT NULL,
    fetched_at INTEGER NOT NULL,
    stale      INTEGER NOT NULL DEFAULT 0
);
"#;

/// A cached payload with its bookkeeping
#[derive(Debug, Clone)]
pub struct CachedEntry {
    pub payload: Value,
    pub fetched_at: DateTime<Utc>,
    pub stale: bool,
    pub digest: String,
}

impl CachedEntry {
    /// Usable without a refetch: not invalidated and within the freshness window
    pub fn is_fresh(&self) -> bool {
        if self.stale {
            return false;
        }
        let age = Utc::now().signed_duration_since(self.fetched_at);
        age.num_seconds() >= 0 && (age.num_seconds() as u64) < FRESH_FOR.as_secs()
    }
}

/// Row summary for `vit cache info`
#[derive(Debug)]
pub struct EntryInfo {
    pub key: String,
    pub fetched_at: DateTime<Utc>,
    pub stale: bool,
    pub digest: String,
    pub records: Option<usize>,
}

/// The query cache backed by SQLite
pub struct QueryCache {
    conn: Connection,
}

impl QueryCache {
    /// Open or create the cache database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).into_diagnostic()?;
        }

        let needs_init = !path.exists();
        let conn = Connection::open(path).into_diagnostic()?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .into_diagnostic()?;

        let cache = Self { conn };

        if needs_init {
            cache.init_schema()?;
        } else if cache.schema_version()? != SCHEMA_VERSION {
            cache.reinitialize()?;
        }

        Ok(cache)
    }

    /// In-memory cache, used by tests and by `--no-cache` style callers
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().into_diagnostic()?;
        let cache = Self { conn };
        cache.init_schema()?;
        Ok(cache)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA).into_diagnostic()?;
        self.conn
            .execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )
            .into_diagnostic()?;
        Ok(())
    }

    fn schema_version(&self) -> Result<i32> {
        let version = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);
        Ok(version)
    }

    fn reinitialize(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "DROP TABLE IF EXISTS schema_version; DROP TABLE IF EXISTS queries;",
            )
            .into_diagnostic()?;
        self.init_schema()
    }

    pub fn get(&self, key: &QueryKey) -> Result<Option<CachedEntry>> {
        let row = self
            .conn
            .query_row(
                "SELECT payload, digest, fetched_at, stale FROM queries WHERE key = ?1",
                params![key.storage_key()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()
            .into_diagnostic()?;

        let Some((payload, digest, fetched_at, stale)) = row else {
            return Ok(None);
        };

        let payload: Value = serde_json::from_str(&payload).into_diagnostic()?;
        let fetched_at = Utc
            .timestamp_opt(fetched_at, 0)
            .single()
            .unwrap_or_else(Utc::now);

        Ok(Some(CachedEntry {
            payload,
            fetched_at,
            stale: stale != 0,
            digest,
        }))
    }

    /// Store a freshly fetched payload, clearing any staleness mark
    pub fn put(&mut self, key: &QueryKey, payload: &Value) -> Result<()> {
        let text = serde_json::to_string(payload).into_diagnostic()?;
        let digest = hex_digest(&text);

        self.conn
            .execute(
                "INSERT INTO queries (key, payload, digest, fetched_at, stale)
                 VALUES (?1, ?2, ?3, ?4, 0)
                 ON CONFLICT(key) DO UPDATE SET
                     payload = excluded.payload,
                     digest = excluded.digest,
                     fetched_at = excluded.fetched_at,
                     stale = 0",
                params![key.storage_key(), text, digest, Utc::now().timestamp()],
            )
            .into_diagnostic()?;
        Ok(())
    }

    /// Mark the given keys stale; the next read refetches them
    pub fn invalidate(&mut self, keys: &[QueryKey]) -> Result<()> {
        for key in keys {
            self.conn
                .execute(
                    "UPDATE queries SET stale = 1 WHERE key = ?1",
                    params![key.storage_key()],
                )
                .into_diagnostic()?;
        }
        Ok(())
    }

    /// Apply the declared invalidation set of a mutation
    pub fn apply_mutation(&mut self, mutation: &Mutation) -> Result<()> {
        self.invalidate(&invalidated_keys(mutation))?;

        // A deleted project takes its wings with it, but their ids are gone
        // by the time the delete confirms. Dropping the whole unit namespace
        // rather than leaking the orphaned entries costs one refetch per
        // still-live wing.
        if matches!(mutation, Mutation::ProjectDelete { .. }) {
            self.purge_prefix("units:")?;
        }
        Ok(())
    }

    fn purge_prefix(&mut self, prefix: &str) -> Result<()> {
        self.conn
            .execute(
                "DELETE FROM queries WHERE key LIKE ?1 || '%'",
                params![prefix],
            )
            .into_diagnostic()?;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.conn
            .execute("DELETE FROM queries", [])
            .into_diagnostic()?;
        Ok(())
    }

    pub fn entries(&self) -> Result<Vec<EntryInfo>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, payload, digest, fetched_at, stale FROM queries ORDER BY key")
            .into_diagnostic()?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })
            .into_diagnostic()?;

        let mut entries = Vec::new();
        for row in rows {
            let (key, payload, digest, fetched_at, stale) = row.into_diagnostic()?;
            let records = serde_json::from_str::<Value>(&payload)
                .ok()
                .and_then(|v| match v {
                    Value::Array(items) => Some(items.len()),
                    Value::Object(obj) => obj
                        .values()
                        .find_map(|v| v.as_array().map(|items| items.len())),
                    _ => None,
                });
            entries.push(EntryInfo {
                key,
                fetched_at: Utc
                    .timestamp_opt(fetched_at, 0)
                    .single()
                    .unwrap_or_else(Utc::now),
                stale: stale != 0,
                digest,
                records,
            });
        }
        Ok(entries)
    }
}

fn hex_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_put_get_roundtrip() {
        let mut cache = QueryCache::in_memory().unwrap();
        let key = QueryKey::Projects;
        let payload = json!([{"id": "p1", "name": "Sky Gardens"}]);

        cache.put(&key, &payload).unwrap();
        let entry = cache.get(&key).unwrap().unwrap();

        assert_eq!(entry.payload, payload);
        assert!(!entry.stale);
        assert!(entry.is_fresh());
        assert_eq!(entry.digest.len(), 64);
    }

    #[test]
    fn test_missing_key_is_none() {
        let cache = QueryCache::in_memory().unwrap();
        assert!(cache
            .get(&QueryKey::Wings {
                project_id: "nope".into()
            })
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_invalidate_marks_stale_until_next_put() {
        let mut cache = QueryCache::in_memory().unwrap();
        let key = QueryKey::Projects;
        cache.put(&key, &json!([])).unwrap();

        cache.apply_mutation(&Mutation::Project).unwrap();
        let entry = cache.get(&key).unwrap().unwrap();
        assert!(entry.stale);
        assert!(!entry.is_fresh());

        // A refetch overwrites the mark.
        cache.put(&key, &json!([1])).unwrap();
        assert!(!cache.get(&key).unwrap().unwrap().stale);
    }

    #[test]
    fn test_invalidation_does_not_touch_unrelated_keys() {
        let mut cache = QueryCache::in_memory().unwrap();
        let wings_p1 = QueryKey::Wings {
            project_id: "p1".into(),
        };
        let wings_p2 = QueryKey::Wings {
            project_id: "p2".into(),
        };
        cache.put(&wings_p1, &json!([])).unwrap();
        cache.put(&wings_p2, &json!([])).unwrap();

        cache
            .apply_mutation(&Mutation::Wing {
                project_id: "p1".into(),
            })
            .unwrap();

        assert!(cache.get(&wings_p1).unwrap().unwrap().stale);
        assert!(!cache.get(&wings_p2).unwrap().unwrap().stale);
    }

    #[test]
    fn test_project_delete_drops_unit_entries() {
        let mut cache = QueryCache::in_memory().unwrap();
        let units = QueryKey::Units {
            wing_id: "w1".into(),
        };
        cache.put(&units, &json!([1, 2])).unwrap();
        cache.put(&QueryKey::Categories, &json!([])).unwrap();

        cache
            .apply_mutation(&Mutation::ProjectDelete {
                project_id: "p1".into(),
            })
            .unwrap();

        // No wing ids survive the delete, so unit entries are removed
        // outright instead of being left to rot.
        assert!(cache.get(&units).unwrap().is_none());
        assert!(cache.get(&QueryKey::Categories).unwrap().is_some());
    }

    #[test]
    fn test_entries_report_record_counts_for_known_shapes() {
        let mut cache = QueryCache::in_memory().unwrap();
        cache.put(&QueryKey::Projects, &json!([1, 2, 3])).unwrap();
        cache
            .put(&QueryKey::Categories, &json!({"data": [1]}))
            .unwrap();

        let entries = cache.entries().unwrap();
        assert_eq!(entries.len(), 2);
        let by_key = |k: &str| entries.iter().find(|e| e.key == k).unwrap();
        assert_eq!(by_key("projects").records, Some(3));
        assert_eq!(by_key("categories").records, Some(1));
    }

    #[test]
    fn test_schema_mismatch_rebuilds_on_disk_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cache.db");

        {
            let mut cache = QueryCache::open(&path).unwrap();
            cache.put(&QueryKey::Projects, &json!([1])).unwrap();
            cache
                .conn
                .execute("UPDATE schema_version SET version = 999", [])
                .unwrap();
        }

        let cache = QueryCache::open(&path).unwrap();
        assert!(cache.get(&QueryKey::Projects).unwrap().is_none());
    }
}
