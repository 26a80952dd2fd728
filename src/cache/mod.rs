//! Cache Module
//!
//! Provides the byte-bounded LRU store and the immutable value type it holds.

mod byteview;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use byteview::ByteView;
pub use lru::{EvictCallback, Keys, LruCache};
pub use stats::StoreStats;
pub use store::CacheStore;

// == Value Contract ==
/// Anything the LRU can hold: it only needs to report its size in bytes.
pub trait Value {
    /// Size in bytes charged against the cache capacity.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
