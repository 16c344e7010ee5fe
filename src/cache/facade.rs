//! TTL Cache Façade
//!
//! Wraps a raw [`KvStore`] with lifetime metadata. Expiration is enforced
//! lazily: a read that finds an expired entry deletes it before reporting
//! `Expired`. Nothing here holds a lock; the store does all mutual exclusion.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::cache::codec::{self, CacheEntry};
use crate::cache::store::{KvStore, StoreError};
use crate::error::{CacheError, Result};

/// Outcome of a single store fetch plus expiration check.
enum Lookup {
    Live(CacheEntry),
    Absent,
    /// Was present but lapsed; already removed from the store.
    Reaped,
}

// == TTL Cache ==
/// TTL-aware cache over an injected store capability.
#[derive(Clone)]
pub struct TtlCache {
    store: Arc<dyn KvStore>,
}

impl TtlCache {
    // == Constructor ==
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    // == Get ==
    /// Returns the live value under `key`.
    ///
    /// Reading an expired entry deletes it and returns `CacheError::Expired`;
    /// the next read sees `CacheError::NotFound`. Undecodable bytes are left
    /// in place and reported as `CacheError::Corrupt`.
    pub fn get(&self, key: &str) -> Result<Value> {
        match self.lookup(key)? {
            Lookup::Live(entry) => Ok(entry.value),
            Lookup::Absent => Err(CacheError::NotFound(key.to_string())),
            Lookup::Reaped => Err(CacheError::Expired(key.to_string())),
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `duration_seconds`, replacing whatever
    /// was there. Concurrent writers race; the last completed write wins.
    pub fn set(&self, key: &str, value: Value, duration_seconds: u64) -> Result<()> {
        let entry = CacheEntry::new(value, Utc::now(), duration_seconds);

        let bytes = codec::encode(&entry).map_err(|source| {
            error!("Failed to encode cache entry for key '{}': {}", key, source);
            CacheError::Encode(source)
        })?;

        self.store.set(key, bytes).map_err(|source| {
            error!("Store write failed for key '{}': {}", key, source);
            CacheError::Store {
                key: key.to_string(),
                source,
            }
        })?;

        debug!("Stored key '{}' expiring at {}", key, entry.expiration);
        Ok(())
    }

    // == Delete ==
    /// Removes `key`, returning whether it was present beforehand.
    ///
    /// The presence check only shapes the answer: an absent key is not an
    /// error, and a failed pre-check never blocks the delete.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let existed = match self.store.get(key) {
            Ok(_) => true,
            Err(StoreError::NotFound) => false,
            Err(source) => {
                warn!("Pre-delete lookup failed for key '{}': {}", key, source);
                true
            }
        };

        match self.store.delete(key) {
            Ok(()) => Ok(existed),
            Err(StoreError::NotFound) => Ok(false),
            Err(source) => {
                error!("Store delete failed for key '{}': {}", key, source);
                Err(CacheError::Store {
                    key: key.to_string(),
                    source,
                })
            }
        }
    }

    // == Exists ==
    /// Reports whether a live entry is stored under `key`.
    ///
    /// Like [`TtlCache::get`], finding an expired entry deletes it.
    pub fn exists(&self, key: &str) -> Result<bool> {
        Ok(matches!(self.lookup(key)?, Lookup::Live(_)))
    }

    /// One fetch, decode, and expiration check; deletes the entry if expired.
    fn lookup(&self, key: &str) -> Result<Lookup> {
        let bytes = match self.store.get(key) {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound) => return Ok(Lookup::Absent),
            Err(source) => {
                error!("Store read failed for key '{}': {}", key, source);
                return Err(CacheError::Store {
                    key: key.to_string(),
                    source,
                });
            }
        };

        let entry = codec::decode(&bytes).map_err(|source| {
            error!("Failed to decode cache entry for key '{}': {}", key, source);
            CacheError::Corrupt {
                key: key.to_string(),
                source,
            }
        })?;

        if !entry.is_expired_at(Utc::now()) {
            return Ok(Lookup::Live(entry));
        }

        match self.store.delete(key) {
            // A concurrent delete got there first.
            Ok(()) | Err(StoreError::NotFound) => {
                debug!("Reaped expired key '{}'", key);
                Ok(Lookup::Reaped)
            }
            Err(source) => {
                error!("Failed to delete expired key '{}': {}", key, source);
                Err(CacheError::Store {
                    key: key.to_string(),
                    source,
                })
            }
        }
    }
}
