//! Gazelle - A distributed read-through cache
//!
//! Groups serve keys from a byte-bounded LRU store, route misses to the
//! owning peer over a consistent-hash ring and fall back to a source loader.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod models;
pub mod peers;
pub mod ring;

pub use api::AppState;
pub use cache::ByteView;
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::{Group, GroupBuilder, GroupRegistry, Loader, LoaderFn};
pub use peers::{HttpPool, PeerGetter, PeerPicker};
pub use ring::HashRing;
