//! Key-value store contracts and SQLite/in-memory implementations.
//!
//! # Responsibility
//! - Persist opaque byte values under a fixed, enumerable key set.
//! - Encode/decode structured values as JSON at the boundary.
//!
//! # Invariants
//! - Only `StorageKey` values can be written; unknown persisted keys are
//!   skipped on listing, never surfaced.
//! - Structured values round-trip losslessly through `save_object` /
//!   `load_object`.
//! - `apply_batch` writes all of its entries or none of them.

use crate::db::{schema_version, DbError, SCHEMA_VERSION};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub type StoreResult<T> = Result<T, StoreError>;

/// Fixed set of keys the app persists under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StorageKey {
    /// Encoded category list with every content and answer outline.
    MeCategoryModelList,
    /// Whole encoded profile record written by older app versions.
    Profile,
    ProfileName,
    /// Profile statement text.
    ProfileValue,
    /// Raw profile image bytes.
    ProfileImage,
}

impl StorageKey {
    pub const ALL: [StorageKey; 5] = [
        StorageKey::MeCategoryModelList,
        StorageKey::Profile,
        StorageKey::ProfileName,
        StorageKey::ProfileValue,
        StorageKey::ProfileImage,
    ];

    /// Persisted key name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MeCategoryModelList => "meCategoryModelList",
            Self::Profile => "profile",
            Self::ProfileName => "profileName",
            Self::ProfileValue => "profileValue",
            Self::ProfileImage => "profileImage",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from key-value store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Connection was not prepared with the key-value schema.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Value could not be encoded for the key.
    Encode {
        key: StorageKey,
        source: serde_json::Error,
    },
    /// Persisted bytes could not be decoded for the key.
    Decode {
        key: StorageKey,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "key-value store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::Encode { key, source } => write!(f, "failed to encode `{key}`: {source}"),
            Self::Decode { key, source } => write!(f, "failed to decode `{key}`: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::Encode { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One write inside an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvWrite {
    Put(StorageKey, Vec<u8>),
    Remove(StorageKey),
}

impl KvWrite {
    /// JSON-encodes `value` into a put for `key`.
    pub fn encode<T: Serialize + ?Sized>(key: StorageKey, value: &T) -> StoreResult<Self> {
        serde_json::to_vec(value)
            .map(|bytes| Self::Put(key, bytes))
            .map_err(|source| StoreError::Encode { key, source })
    }
}

/// Byte-oriented key-value persistence.
pub trait KeyValueStore {
    fn get(&self, key: StorageKey) -> StoreResult<Option<Vec<u8>>>;
    fn put(&self, key: StorageKey, value: &[u8]) -> StoreResult<()>;
    /// Removes the entry; returns whether one existed.
    fn remove(&self, key: StorageKey) -> StoreResult<bool>;
    /// Keys that currently hold a value, in `StorageKey` order.
    fn keys(&self) -> StoreResult<Vec<StorageKey>>;
    /// Applies every write in order, or none of them on error.
    fn apply_batch(&self, writes: &[KvWrite]) -> StoreResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: StorageKey) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: StorageKey, value: &[u8]) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn remove(&self, key: StorageKey) -> StoreResult<bool> {
        (**self).remove(key)
    }

    fn keys(&self) -> StoreResult<Vec<StorageKey>> {
        (**self).keys()
    }

    fn apply_batch(&self, writes: &[KvWrite]) -> StoreResult<()> {
        (**self).apply_batch(writes)
    }
}

/// Encodes `value` as JSON and stores it under `key`.
pub fn save_object<S, T>(store: &S, key: StorageKey, value: &T) -> StoreResult<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let encoded =
        serde_json::to_vec(value).map_err(|source| StoreError::Encode { key, source })?;
    store.put(key, &encoded)
}

/// Loads and decodes the JSON value under `key`; `None` when absent.
pub fn load_object<S, T>(store: &S, key: StorageKey) -> StoreResult<Option<T>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key)? {
        Some(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Decode { key, source }),
        None => Ok(None),
    }
}

/// In-process store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<BTreeMap<StorageKey, Vec<u8>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: StorageKey) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.borrow().get(&key).cloned())
    }

    fn put(&self, key: StorageKey, value: &[u8]) -> StoreResult<()> {
        self.entries.borrow_mut().insert(key, value.to_vec());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> StoreResult<bool> {
        Ok(self.entries.borrow_mut().remove(&key).is_some())
    }

    fn keys(&self) -> StoreResult<Vec<StorageKey>> {
        Ok(self.entries.borrow().keys().copied().collect())
    }

    fn apply_batch(&self, writes: &[KvWrite]) -> StoreResult<()> {
        let mut entries = self.entries.borrow_mut();
        for write in writes {
            match write {
                KvWrite::Put(key, value) => {
                    entries.insert(*key, value.clone());
                }
                KvWrite::Remove(key) => {
                    entries.remove(key);
                }
            }
        }
        Ok(())
    }
}

/// SQLite-backed store over the `kv_entries` table.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Creates a store from a connection opened through `db::open_db*`.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let expected_version = SCHEMA_VERSION;
        let actual_version = schema_version(conn)?;
        if actual_version < expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: StorageKey) -> StoreResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                params![key.as_str()],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: StorageKey, value: &[u8]) -> StoreResult<()> {
        upsert_entry(self.conn, key, value)
    }

    fn remove(&self, key: StorageKey) -> StoreResult<bool> {
        delete_entry(self.conn, key)
    }

    fn keys(&self) -> StoreResult<Vec<StorageKey>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv_entries;")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut keys = Vec::with_capacity(names.len());
        for name in names {
            match StorageKey::from_name(&name) {
                Some(key) => keys.push(key),
                None => {
                    warn!("event=kv_keys module=repo status=skip reason=unknown_key key={name}")
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn apply_batch(&self, writes: &[KvWrite]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for write in writes {
            match write {
                KvWrite::Put(key, value) => upsert_entry(&tx, *key, value)?,
                KvWrite::Remove(key) => {
                    delete_entry(&tx, *key)?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn upsert_entry(conn: &Connection, key: StorageKey, value: &[u8]) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at;",
        params![key.as_str(), value, now_epoch_ms()],
    )?;
    Ok(())
}

fn delete_entry(conn: &Connection, key: StorageKey) -> StoreResult<bool> {
    let changed = conn.execute(
        "DELETE FROM kv_entries WHERE key = ?1;",
        params![key.as_str()],
    )?;
    Ok(changed > 0)
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
