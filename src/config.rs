//! Configuration Module
//!
//! Handles loading and managing node configuration from environment variables.

use std::env;

use crate::peers::DEFAULT_REPLICAS;

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// This node's base URL as it appears in the peer list
    pub self_url: String,
    /// Base URLs of every node in the cluster, this one included
    pub peers: Vec<String>,
    /// Byte budget of the demo group's store, 0 = unbounded
    pub cache_bytes: usize,
    /// Virtual nodes per peer on the hash ring
    pub replicas: usize,
    /// Name of the group served by this node
    pub group_name: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8001)
    /// - `SELF_URL` - This node's URL (default: `http://localhost:<SERVER_PORT>`)
    /// - `PEERS` - Comma-separated peer URLs (default: only `SELF_URL`)
    /// - `CACHE_BYTES` - Store budget in bytes (default: 2048)
    /// - `REPLICAS` - Virtual nodes per peer (default: 50)
    /// - `GROUP_NAME` - Served group (default: `scores`)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.server_port);
        let self_url = env::var("SELF_URL")
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default_self_url(server_port));
        let peers = env::var("PEERS")
            .ok()
            .map(|v| parse_peers(&v))
            .filter(|peers| !peers.is_empty())
            .unwrap_or_else(|| vec![self_url.clone()]);

        Self {
            server_port,
            self_url,
            peers,
            cache_bytes: env::var("CACHE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_bytes),
            replicas: env::var("REPLICAS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&r| r > 0)
                .unwrap_or(defaults.replicas),
            group_name: env::var("GROUP_NAME")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.group_name),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let server_port = 8001;
        let self_url = default_self_url(server_port);
        Self {
            server_port,
            peers: vec![self_url.clone()],
            self_url,
            cache_bytes: 2 << 10,
            replicas: DEFAULT_REPLICAS,
            group_name: "scores".to_string(),
        }
    }
}

fn default_self_url(port: u16) -> String {
    format!("http://localhost:{port}")
}

/// Splits a comma-separated peer list, dropping blanks and trailing slashes.
fn parse_peers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|peer| peer.trim().trim_end_matches('/'))
        .filter(|peer| !peer.is_empty())
        .map(str::to_string)
        .collect()
}
