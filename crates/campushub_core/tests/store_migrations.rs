use campushub_core::store::migrations::{apply_migrations, latest_version};
use campushub_core::store::{open_store, open_store_in_memory, StoreError};
use campushub_core::{KvStorage, SqliteKvStorage, StorageKey};

#[test]
fn fresh_store_reaches_latest_version() {
    let conn = open_store_in_memory().unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
    assert!(latest_version() >= 1);
}

#[test]
fn apply_is_idempotent() {
    let mut conn = open_store_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    apply_migrations(&mut conn).unwrap();

    let storage = SqliteKvStorage::new(&conn);
    let key = StorageKey::new("feed", "posts");
    storage.put(&key, "[]").unwrap();
    assert_eq!(storage.get(&key).unwrap().as_deref(), Some("[]"));
}

#[test]
fn newer_schema_version_is_rejected() {
    let mut conn = open_store_in_memory().unwrap();
    let future = latest_version() + 5;
    conn.execute_batch(&format!("PRAGMA user_version = {future};"))
        .unwrap();

    let err = apply_migrations(&mut conn).unwrap_err();
    assert!(matches!(
        err,
        StoreError::UnsupportedSchemaVersion { db_version, latest_supported }
            if db_version == future && latest_supported == latest_version()
    ));
}

#[test]
fn file_store_roundtrips_payloads_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("campushub.db");
    let key = StorageKey::new("life", "posts");

    {
        let conn = open_store(&path).unwrap();
        let storage = SqliteKvStorage::new(&conn);
        storage.put(&key, r#"[{"hello":"world"}]"#).unwrap();
    }

    let conn = open_store(&path).unwrap();
    let storage = SqliteKvStorage::new(&conn);
    assert_eq!(
        storage.get(&key).unwrap().as_deref(),
        Some(r#"[{"hello":"world"}]"#)
    );
}

#[test]
fn put_upserts_and_remove_deletes() {
    let conn = open_store_in_memory().unwrap();
    let storage = SqliteKvStorage::new(&conn);
    let key = StorageKey::new("chat", "conversations");

    storage.put(&key, "[1]").unwrap();
    storage.put(&key, "[1,2]").unwrap();
    assert_eq!(storage.get(&key).unwrap().as_deref(), Some("[1,2]"));

    storage.remove(&key).unwrap();
    assert!(storage.get(&key).unwrap().is_none());

    storage.put(&StorageKey::new("a", "x"), "1").unwrap();
    storage.put(&StorageKey::new("b", "y"), "2").unwrap();
    let keys = storage.keys().unwrap();
    assert_eq!(keys, vec!["campus.a.x".to_string(), "campus.b.y".to_string()]);
}
