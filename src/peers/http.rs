//! HTTP Peers
//!
//! [`HttpPool`] routes keys to peers over a consistent-hash ring and hands
//! out one [`HttpGetter`] per peer. Peers serve values at
//! `GET {base}/_gazelle/{group}/{key}` (see `api::routes`).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use parking_lot::Mutex;
use reqwest::{StatusCode, Url};
use tokio::runtime::Handle;
use tracing::debug;

use crate::peers::{PeerGetter, PeerPicker};
use crate::ring::HashRing;

// == Public Constants ==
/// First path segment of the peer-serving endpoint.
pub const DEFAULT_BASE_PATH: &str = "_gazelle";

/// Virtual nodes per peer.
pub const DEFAULT_REPLICAS: usize = 50;

// == HTTP Getter ==
/// Fetches values from one peer over HTTP.
///
/// `get` blocks the calling thread on the runtime; call it from a blocking
/// context such as `tokio::task::spawn_blocking`, never from an async task.
#[derive(Clone)]
pub struct HttpGetter {
    base_url: String,
    client: reqwest::Client,
    runtime: Handle,
}

impl HttpGetter {
    /// Creates a getter for the peer at `base_url` (e.g. `http://10.0.0.2:8001`).
    pub fn new(base_url: impl Into<String>, client: reqwest::Client, runtime: Handle) -> Self {
        Self {
            base_url: base_url.into(),
            client,
            runtime,
        }
    }

    /// Builds `{base}/_gazelle/{group}/{key}` with both segments escaped.
    fn url_for(&self, group: &str, key: &str) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid peer url {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("peer url {} cannot be a base", self.base_url))?
            .pop_if_empty()
            .extend([DEFAULT_BASE_PATH, group, key]);
        Ok(url)
    }

    async fn fetch(&self, url: Url) -> anyhow::Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            bail!("peer {} returned {}", self.base_url, status);
        }
        let body = response
            .bytes()
            .await
            .context("reading response body")?;
        Ok(body.to_vec())
    }
}

impl PeerGetter for HttpGetter {
    fn get(&self, group: &str, key: &str) -> anyhow::Result<Vec<u8>> {
        let url = self.url_for(group, key)?;
        self.runtime.block_on(self.fetch(url))
    }
}

impl fmt::Debug for HttpGetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpGetter")
            .field("base_url", &self.base_url)
            .finish()
    }
}

// == HTTP Pool ==
#[derive(Debug)]
struct PoolState {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

/// Peer picker backed by a consistent-hash ring of HTTP peers.
///
/// The ring is rebuilt and queried under one lock, so `set_peers` may run
/// while traffic is being served.
#[derive(Debug)]
pub struct HttpPool {
    self_url: String,
    replicas: usize,
    client: reqwest::Client,
    runtime: Handle,
    state: Mutex<PoolState>,
}

impl HttpPool {
    // == Constructor ==
    /// Creates an empty pool for the node reachable at `self_url`.
    pub fn new(self_url: impl Into<String>, runtime: Handle) -> Self {
        Self::with_replicas(self_url, DEFAULT_REPLICAS, runtime)
    }

    pub fn with_replicas(self_url: impl Into<String>, replicas: usize, runtime: Handle) -> Self {
        Self {
            self_url: self_url.into(),
            replicas,
            client: reqwest::Client::new(),
            runtime,
            state: Mutex::new(PoolState {
                ring: HashRing::new(replicas),
                getters: HashMap::new(),
            }),
        }
    }

    pub fn self_url(&self) -> &str {
        &self.self_url
    }

    // == Set Peers ==
    /// Replaces the peer set. `peers` should include this node's own URL.
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let peers: Vec<String> = peers.into_iter().map(Into::into).collect();

        let mut ring = HashRing::new(self.replicas);
        ring.add(&peers);

        let getters = peers
            .iter()
            .map(|peer| {
                let getter = HttpGetter::new(peer.clone(), self.client.clone(), self.runtime.clone());
                (peer.clone(), Arc::new(getter))
            })
            .collect();

        let mut state = self.state.lock();
        state.ring = ring;
        state.getters = getters;
        debug!(peers = ?peers, "peer set updated");
    }

    /// Currently known peers, in no particular order.
    pub fn peers(&self) -> Vec<String> {
        self.state.lock().getters.keys().cloned().collect()
    }

    /// Node owning `key` on the ring, including this node itself.
    pub fn owner_of(&self, key: &str) -> Option<String> {
        self.state.lock().ring.get(key).map(str::to_string)
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.state.lock();
        let peer = state.ring.get(key)?;
        if peer == self.self_url {
            return None;
        }

        debug!(peer, key, "picked remote peer");
        let getter = state.getters.get(peer)?;
        Some(Arc::clone(getter) as Arc<dyn PeerGetter>)
    }
}
