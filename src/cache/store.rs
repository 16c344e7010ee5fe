//! Key-Value Store Module
//!
//! The byte-in/byte-out storage boundary the TTL façade is written against,
//! plus the bundled concurrent in-memory engine.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use thiserror::Error;

// == Store Error ==
/// Failures reported by a [`KvStore`].
///
/// `NotFound` is the "entry absent" signal; every other variant is a real failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No entry under the requested key
    #[error("entry not found")]
    NotFound,

    /// Value is larger than the store accepts
    #[error("entry of {size} bytes exceeds the maximum of {max} bytes")]
    EntryTooLarge { size: usize, max: usize },

    /// Store could not be constructed from the given parameters
    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),

    /// Any other backend failure
    #[error("store failure: {0}")]
    Backend(String),
}

// == Store Capability ==
/// Concurrent-safe key-value storage keyed by string.
///
/// Implementations own all mutual exclusion. Callers share one instance
/// across tasks and never wrap it in their own lock.
pub trait KvStore: Send + Sync + 'static {
    /// Returns the raw bytes stored under `key`, or `StoreError::NotFound`.
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Stores `value` under `key`, replacing any existing bytes.
    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Removes `key`. Returns `StoreError::NotFound` if nothing was stored.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug)]
struct Slot {
    bytes: Vec<u8>,
    written_at: Instant,
}

// == Memory Store ==
/// Sharded in-memory store with a hard per-entry life window.
///
/// The life window is a backstop against unbounded growth: anything older
/// reads as absent no matter what the bytes say, and [`MemoryStore::purge_stale`]
/// reclaims it.
#[derive(Debug)]
pub struct MemoryStore {
    slots: DashMap<String, Slot>,
    life_window: Duration,
    max_entry_size: usize,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `life_window` - Hard lifetime of every stored entry
    /// * `max_entry_size` - Largest accepted value in bytes
    pub fn new(life_window: Duration, max_entry_size: usize) -> Result<Self, StoreError> {
        if life_window.is_zero() {
            return Err(StoreError::InvalidConfig(
                "life window must be non-zero".to_string(),
            ));
        }
        if max_entry_size == 0 {
            return Err(StoreError::InvalidConfig(
                "max entry size must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            slots: DashMap::new(),
            life_window,
            max_entry_size,
        })
    }

    /// Creates a store from server configuration.
    pub fn from_config(config: &crate::config::Config) -> Result<Self, StoreError> {
        Self::new(
            Duration::from_secs(config.default_ttl),
            config.max_entry_size,
        )
    }

    /// Stale only once strictly past the life window, matching entry expiry.
    fn is_stale(&self, slot: &Slot, now: Instant) -> bool {
        now.saturating_duration_since(slot.written_at) > self.life_window
    }

    // == Purge Stale ==
    /// Removes every entry past the life window.
    ///
    /// Returns the number of entries removed.
    pub fn purge_stale(&self) -> usize {
        let now = Instant::now();
        let before = self.slots.len();
        self.slots.retain(|_, slot| !self.is_stale(slot, now));
        before.saturating_sub(self.slots.len())
    }

    /// Number of entries currently held, stale ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let now = Instant::now();
        match self.slots.get(key) {
            Some(slot) if !self.is_stale(&slot, now) => Ok(slot.bytes.clone()),
            Some(slot) => {
                // Release the shard guard before removing.
                drop(slot);
                self.slots.remove_if(key, |_, slot| self.is_stale(slot, now));
                Err(StoreError::NotFound)
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        if value.len() > self.max_entry_size {
            return Err(StoreError::EntryTooLarge {
                size: value.len(),
                max: self.max_entry_size,
            });
        }

        self.slots.insert(
            key.to_string(),
            Slot {
                bytes: value,
                written_at: Instant::now(),
            },
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        match self.slots.remove(key) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }
}
