//! Cache Module
//!
//! TTL storage for serialized responses and the read-through wrapper the
//! HTTP handlers go through.

mod entry;
mod read_through;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use read_through::{cache_key, round_coordinate, CachedJson, ReadThroughCache};
pub use stats::CacheStats;
pub use store::{CacheBackend, SharedStore, TtlStore};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed payload size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// Longest TTL an entry can carry (one year).
pub const MAX_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;
