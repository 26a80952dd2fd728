//! Group Module
//!
//! A group is a named cache namespace. It owns one [`CacheStore`], the
//! [`Loader`] for its authoritative data and, optionally, a [`PeerPicker`]
//! that routes misses to the node owning the key.
//!
//! # Read path
//! ```text
//! get ──hit──────────────────────────────────────────▶ value
//!  │
//!  └─miss─▶ pick_peer ──remote owner─▶ peer.get ──ok──▶ value
//!               │                         │
//!               │ none / self             └─err─┐
//!               ▼                               ▼
//!           loader.load ──ok──▶ populate store ──▶ value
//!               └─err──▶ CacheError::Load
//! ```
//!
//! Concurrent misses for the same key are not collapsed; each one runs the
//! full load path.

mod loader;
mod registry;
mod stats;

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, info, warn};

use crate::cache::{ByteView, CacheStore};
use crate::error::{CacheError, Result};
use crate::peers::{PeerGetter, PeerPicker};

pub use loader::{Loader, LoaderFn};
pub use registry::GroupRegistry;
pub use stats::{GroupStats, GroupStatsSnapshot};

// == Group ==
pub struct Group {
    name: String,
    loader: Arc<dyn Loader>,
    store: CacheStore,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    stats: GroupStats,
}

impl Group {
    // == Constructor ==
    pub(crate) fn new(name: String, cache_bytes: usize, loader: Arc<dyn Loader>) -> Self {
        Self {
            name,
            loader,
            store: CacheStore::new(cache_bytes),
            peers: OnceLock::new(),
            stats: GroupStats::new(),
        }
    }

    /// Starts building a group with a byte budget of `cache_bytes` (0 = unbounded).
    pub fn builder(name: impl Into<String>, cache_bytes: usize) -> GroupBuilder {
        GroupBuilder {
            name: name.into(),
            cache_bytes,
            loader: None,
            peers: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The group's local store.
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn stats(&self) -> GroupStatsSnapshot {
        self.stats.snapshot()
    }

    // == Register Peers ==
    /// Attaches the peer picker. A group accepts exactly one.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers.set(peers).map_err(|_| {
            CacheError::Precondition(format!(
                "peers already registered for group {}",
                self.name
            ))
        })
    }

    pub fn has_peers(&self) -> bool {
        self.peers.get().is_some()
    }

    // == Get ==
    /// Returns the value for `key`, loading it on a miss.
    ///
    /// May block on the loader or on a remote peer. With an
    /// [`HttpPool`](crate::peers::HttpPool) registered, call this from a
    /// blocking context (e.g. `tokio::task::spawn_blocking`); calling it on an
    /// async worker thread panics when a remote fetch is attempted.
    pub fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::InvalidArgument("key is required".to_string()));
        }
        self.stats.record_get();

        if let Some(value) = self.store.get(key) {
            debug!(group = %self.name, key, "cache hit");
            self.stats.record_hit();
            return Ok(value);
        }

        self.load(key)
    }

    // == Load ==
    /// Miss path: owning peer first, then the local loader.
    ///
    /// A value served by a peer is not stored locally; the peer owns it.
    /// Same blocking-context requirement as [`Group::get`].
    pub fn load(&self, key: &str) -> Result<ByteView> {
        if let Some(peer) = self.peers.get().and_then(|picker| picker.pick_peer(key)) {
            match self.get_from_peer(peer.as_ref(), key) {
                Ok(value) => {
                    self.stats.record_peer_load();
                    return Ok(value);
                }
                Err(err) => {
                    self.stats.record_peer_error();
                    warn!(group = %self.name, key, error = %err, "failed to get from peer");
                }
            }
        }

        self.get_locally(key)
    }

    fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let bytes = peer
            .get(&self.name, key)
            .map_err(|err| CacheError::Peer(format!("{err:#}")))?;
        Ok(ByteView::from(bytes))
    }

    fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = self.loader.load(key).map_err(|err| {
            self.stats.record_load_error();
            CacheError::Load(err)
        })?;

        info!(group = %self.name, key, bytes = bytes.len(), "loaded from source");
        self.stats.record_local_load();

        let value = ByteView::from(bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.store.add(key, value);
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("store", &self.store)
            .field("has_peers", &self.has_peers())
            .finish()
    }
}

// == Group Builder ==
/// Validating builder for [`Group`].
pub struct GroupBuilder {
    name: String,
    cache_bytes: usize,
    loader: Option<Arc<dyn Loader>>,
    peers: Option<Arc<dyn PeerPicker>>,
}

impl GroupBuilder {
    pub fn loader(mut self, loader: impl Loader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Uses a closure as the loader.
    pub fn loader_fn<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync + 'static,
    {
        self.loader(LoaderFn(f))
    }

    pub fn peers(mut self, peers: Arc<dyn PeerPicker>) -> Self {
        self.peers = Some(peers);
        self
    }

    // == Build ==
    /// Fails with [`CacheError::Precondition`] when no loader was given.
    pub fn build(self) -> Result<Group> {
        let loader = self.loader.ok_or_else(|| {
            CacheError::Precondition(format!("group {} requires a loader", self.name))
        })?;

        let group = Group::new(self.name, self.cache_bytes, loader);
        if let Some(peers) = self.peers {
            group.register_peers(peers)?;
        }
        Ok(group)
    }
}
