//! Peers Module
//!
//! Capabilities a group uses to reach other cache nodes, plus the HTTP
//! implementation of both.

mod http;

use std::sync::Arc;

pub use http::{HttpGetter, HttpPool, DEFAULT_BASE_PATH, DEFAULT_REPLICAS};

// == Peer Picker ==
/// Decides which peer, if any, owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the owning peer, or `None` when the key should be loaded
    /// locally (no peers known, or this node owns it).
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

// == Peer Getter ==
/// Fetches a value for a group from one remote peer.
pub trait PeerGetter: Send + Sync {
    fn get(&self, group: &str, key: &str) -> anyhow::Result<Vec<u8>>;
}
