//! Cache Module
//!
//! TTL-aware caching over a byte-oriented key-value store.

mod codec;
mod facade;
mod store;


// Re-export public types
pub use codec::{decode, encode, CacheEntry};
pub use facade::TtlCache;
pub use store::{KvStore, MemoryStore, StoreError};

// == Public Constants ==
/// Default maximum stored entry size in bytes
pub const DEFAULT_MAX_ENTRY_SIZE: usize = 1024 * 1024; // 1 MB
