//! Consistent Hash Ring
//!
//! Maps keys to node identifiers. Each real node is placed on the ring as
//! `replicas` virtual points, hashed from `"{index}{node}"`; a key belongs to
//! the first point clockwise from its own hash.
//!
//! The ring does no locking of its own. Build it before serving lookups, or
//! guard it with a lock as [`HttpPool`](crate::peers::HttpPool) does.

use std::collections::HashMap;
use std::fmt;

/// Hash function used to place points and keys on the ring.
pub type HashFn = Box<dyn Fn(&[u8]) -> u32 + Send + Sync>;

// == Hash Ring ==
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Sorted virtual point hashes
    points: Vec<u32>,
    /// Virtual point to real node
    nodes: HashMap<u32, String>,
}

impl HashRing {
    // == Constructor ==
    /// Creates an empty ring hashing with CRC-32 (IEEE).
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, crc32fast::hash)
    }

    /// Creates an empty ring with a custom hash function.
    pub fn with_hasher<F>(replicas: usize, hash: F) -> Self
    where
        F: Fn(&[u8]) -> u32 + Send + Sync + 'static,
    {
        Self {
            hash: Box::new(hash),
            replicas,
            points: Vec::new(),
            nodes: HashMap::new(),
        }
    }

    // == Add ==
    /// Places `replicas` virtual points per node, then sorts once.
    ///
    /// Re-adding a node is harmless for lookups but its points are appended
    /// again rather than deduplicated.
    pub fn add<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            for i in 0..self.replicas {
                let point = (self.hash)(format!("{i}{node}").as_bytes());
                self.points.push(point);
                self.nodes.insert(point, node.to_string());
            }
        }
        self.points.sort_unstable();
    }

    // == Get ==
    /// Returns the node owning `key`, or `None` on an empty ring.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.points.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.points.partition_point(|&point| point < hash);
        let point = self.points[idx % self.points.len()];
        self.nodes.get(&point).map(String::as_str)
    }

    // == Introspection ==
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of virtual points, duplicates included.
    pub fn len(&self) -> usize {
        self.points.len()
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("points", &self.points.len())
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Parses the input as a decimal number so point placement is obvious.
    fn decimal_hash(data: &[u8]) -> u32 {
        std::str::from_utf8(data).unwrap().parse().unwrap()
    }

    #[test]
    fn test_ring_empty_returns_none() {
        let ring = HashRing::new(3);
        assert!(ring.is_empty());
        assert_eq!(ring.get("anything"), None);
    }

    #[test]
    fn test_ring_placement_with_custom_hash() {
        let mut ring = HashRing::with_hasher(3, decimal_hash);

        // Points: 2/12/22, 4/14/24, 6/16/26
        ring.add(["6", "4", "2"]);
        assert_eq!(ring.len(), 9);

        let cases = [("2", "2"), ("11", "2"), ("23", "4"), ("27", "2")];
        for (key, node) in cases {
            assert_eq!(ring.get(key), Some(node), "key {key}");
        }

        // Points 8/18/28 take over 27
        ring.add(["8"]);
        let cases = [("2", "2"), ("11", "2"), ("23", "4"), ("27", "8")];
        for (key, node) in cases {
            assert_eq!(ring.get(key), Some(node), "key {key}");
        }
    }

    #[test]
    fn test_ring_wraps_around() {
        let mut ring = HashRing::with_hasher(1, decimal_hash);
        ring.add(["10", "20"]);

        // "010" -> 10, "020" -> 20; 25 is past the last point
        assert_eq!(ring.get("25"), Some("10"));
        assert_eq!(ring.get("5"), Some("10"));
        assert_eq!(ring.get("15"), Some("20"));
    }

    #[test]
    fn test_ring_is_deterministic() {
        let mut ring = HashRing::new(3);
        ring.add(["A", "B", "C"]);

        let first = ring.get("userA42").map(str::to_string);
        assert!(matches!(first.as_deref(), Some("A" | "B" | "C")));
        for _ in 0..100 {
            assert_eq!(ring.get("userA42").map(str::to_string), first);
        }
    }

    #[test]
    fn test_ring_same_nodes_same_routing() {
        let mut left = HashRing::new(10);
        let mut right = HashRing::new(10);
        left.add(["A", "B", "C"]);
        right.add(["C"]);
        right.add(["A", "B"]);

        for i in 0..500 {
            let key = format!("key{i}");
            assert_eq!(left.get(&key), right.get(&key));
        }
    }

    #[test]
    fn test_ring_covers_every_node() {
        let mut ring = HashRing::new(3);
        ring.add(["A", "B", "C"]);

        let seen: HashSet<_> = (0..1000)
            .filter_map(|i| ring.get(&format!("key-{i}")).map(str::to_string))
            .collect();

        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_ring_readd_keeps_routing() {
        let mut ring = HashRing::new(5);
        ring.add(["A", "B"]);
        let before: Vec<_> = (0..200)
            .map(|i| ring.get(&format!("k{i}")).map(str::to_string))
            .collect();

        ring.add(["A"]);
        assert_eq!(ring.len(), 15);

        let after: Vec<_> = (0..200)
            .map(|i| ring.get(&format!("k{i}")).map(str::to_string))
            .collect();
        assert_eq!(before, after);
    }
}
