//! String-keyed JSON blob adapter over the local store.
//!
//! # Responsibility
//! - Provide the narrow get/put/remove surface repositories persist through.
//! - Namespace storage keys per module so collections cannot collide.
//!
//! # Invariants
//! - Keys are always produced by [`StorageKey`]; raw strings never reach SQL.
//! - `put` upserts and refreshes `updated_at`.

use crate::store::StoreResult;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

const KEY_NAMESPACE: &str = "campus";

/// Namespaced storage key: `campus.<module>.<name>`.
///
/// The namespace replaces the flat global key space of earlier iterations of
/// this system, where similar names across modules could collide.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(module: &str, name: &str) -> Self {
        Self(format!("{KEY_NAMESPACE}.{module}.{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage adapter contract for keyed JSON documents.
///
/// Repositories depend on this trait, never on a concrete backend, so tests
/// and degraded in-memory operation use the same code paths as SQLite.
pub trait KvStorage {
    fn get(&self, key: &StorageKey) -> StoreResult<Option<String>>;
    fn put(&self, key: &StorageKey, payload: &str) -> StoreResult<()>;
    fn remove(&self, key: &StorageKey) -> StoreResult<()>;
    fn keys(&self) -> StoreResult<Vec<String>>;
}

/// SQLite-backed storage adapter.
pub struct SqliteKvStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStorage<'conn> {
    /// Constructs an adapter from a migrated/ready connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KvStorage for SqliteKvStorage<'_> {
    fn get(&self, key: &StorageKey) -> StoreResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM kv_entries WHERE store_key = ?1;",
                [key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn put(&self, key: &StorageKey, payload: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (store_key, payload, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(store_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![key.as_str(), payload],
        )?;
        Ok(())
    }

    fn remove(&self, key: &StorageKey) -> StoreResult<()> {
        self.conn.execute(
            "DELETE FROM kv_entries WHERE store_key = ?1;",
            [key.as_str()],
        )?;
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT store_key FROM kv_entries ORDER BY store_key ASC;")?;
        let mut rows = stmt.query([])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get::<_, String>(0)?);
        }
        Ok(keys)
    }
}

/// In-memory storage adapter for tests and degraded operation.
#[derive(Debug, Default)]
pub struct MemoryKvStorage {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryKvStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStorage for MemoryKvStorage {
    fn get(&self, key: &StorageKey) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key.as_str()).cloned())
    }

    fn put(&self, key: &StorageKey, payload: &str) -> StoreResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.as_str().to_string(), payload.to_string());
        Ok(())
    }

    fn remove(&self, key: &StorageKey) -> StoreResult<()> {
        self.entries.borrow_mut().remove(key.as_str());
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{KvStorage, MemoryKvStorage, StorageKey};

    #[test]
    fn storage_key_is_namespaced_per_module() {
        let materials = StorageKey::new("academic", "materials");
        let admin_courses = StorageKey::new("admin", "courses");
        assert_eq!(materials.as_str(), "campus.academic.materials");
        assert_ne!(
            StorageKey::new("academic", "courses"),
            admin_courses,
            "same collection name in two modules must not collide"
        );
    }

    #[test]
    fn memory_storage_roundtrip() {
        let storage = MemoryKvStorage::new();
        let key = StorageKey::new("feed", "posts");
        assert!(storage.get(&key).unwrap().is_none());

        storage.put(&key, "[]").unwrap();
        assert_eq!(storage.get(&key).unwrap().as_deref(), Some("[]"));

        storage.remove(&key).unwrap();
        assert!(storage.get(&key).unwrap().is_none());
    }
}
