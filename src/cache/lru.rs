//! LRU Cache Module
//!
//! Byte-bounded least-recently-used store. Entries live in a slab-backed
//! doubly-linked list (front = most recent) with a key index for O(1) access.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::cache::Value;

/// Callback invoked with each entry removed by eviction.
pub type EvictCallback<V> = Box<dyn FnMut(&str, &V) + Send>;

// == Node ==
struct Node<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

impl<V: Value> Node<V> {
    fn size(&self) -> usize {
        self.key.len() + self.value.len()
    }
}

// == LRU Cache ==
/// Byte-bounded LRU cache.
///
/// Every entry costs `key.len() + value.len()` bytes. When `max_bytes` is
/// non-zero, `used_bytes() <= max_bytes` holds once `add` returns.
pub struct LruCache<V> {
    /// Key to slab slot
    map: HashMap<String, usize>,
    /// Slab of list nodes; `None` slots are on the free list
    nodes: Vec<Option<Node<V>>>,
    /// Most recently used
    head: Option<usize>,
    /// Least recently used
    tail: Option<usize>,
    free_list: Vec<usize>,
    /// Capacity in bytes, 0 = unbounded
    max_bytes: usize,
    used_bytes: usize,
    on_evicted: Option<EvictCallback<V>>,
}

impl<V: Value> LruCache<V> {
    // == Constructor ==
    /// Creates a cache bounded to `max_bytes` (0 disables the bound).
    pub fn new(max_bytes: usize) -> Self {
        Self {
            map: HashMap::new(),
            nodes: Vec::new(),
            head: None,
            tail: None,
            free_list: Vec::new(),
            max_bytes,
            used_bytes: 0,
            on_evicted: None,
        }
    }

    /// Creates a cache that reports every evicted entry to `on_evicted`.
    ///
    /// The callback runs synchronously inside the `add` that caused the
    /// eviction.
    pub fn with_on_evicted<F>(max_bytes: usize, on_evicted: F) -> Self
    where
        F: FnMut(&str, &V) + Send + 'static,
    {
        let mut cache = Self::new(max_bytes);
        cache.on_evicted = Some(Box::new(on_evicted));
        cache
    }

    // == Add ==
    /// Inserts or replaces `key`, making it the most recently used entry.
    ///
    /// Evicts from the tail until the byte bound holds again and returns how
    /// many entries were evicted. An entry larger than the whole capacity is
    /// evicted right after insertion.
    pub fn add(&mut self, key: impl Into<String>, value: V) -> usize {
        let key = key.into();

        if let Some(&idx) = self.map.get(&key) {
            if let Some(node) = self.nodes[idx].as_mut() {
                self.used_bytes = self.used_bytes - node.value.len() + value.len();
                node.value = value;
            }
            self.move_to_front(idx);
        } else {
            self.used_bytes += key.len() + value.len();
            let idx = self.alloc_node(Node {
                key: key.clone(),
                value,
                prev: None,
                next: None,
            });
            self.push_front(idx);
            self.map.insert(key, idx);
        }

        let mut evicted = 0;
        while self.max_bytes != 0 && self.used_bytes > self.max_bytes {
            if self.remove_oldest().is_none() {
                break;
            }
            evicted += 1;
        }
        evicted
    }

    // == Get ==
    /// Looks up `key`; a hit makes it the most recently used entry.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.move_to_front(idx);
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    // == Peek ==
    /// Looks up `key` without touching recency.
    pub fn peek(&self, key: &str) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry and returns it.
    ///
    /// Fires the eviction callback, if any, before returning.
    pub fn remove_oldest(&mut self) -> Option<(String, V)> {
        let idx = self.tail?;
        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.free_list.push(idx);
        self.map.remove(&node.key);
        self.used_bytes -= node.size();

        debug!(key = %node.key, used_bytes = self.used_bytes, "evicted entry");
        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(&node.key, &node.value);
        }
        Some((node.key, node.value))
    }

    // == Introspection ==
    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Bytes currently accounted to resident entries.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys {
            cache: self,
            cursor: self.head,
        }
    }

    // == List Plumbing ==
    fn alloc_node(&mut self, node: Node<V>) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx] = Some(node);
            idx
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.nodes[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.nodes[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.nodes[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.nodes[idx].as_mut() {
            node.prev = None;
            node.next = None;
        }
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.nodes[idx].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        if let Some(h) = old_head {
            if let Some(node) = self.nodes[h].as_mut() {
                node.prev = Some(idx);
            }
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }
}

impl<V> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.map.len())
            .field("used_bytes", &self.used_bytes)
            .field("max_bytes", &self.max_bytes)
            .finish()
    }
}

// == Keys Iterator ==
/// Iterator over keys in recency order, most recent first.
pub struct Keys<'a, V> {
    cache: &'a LruCache<V>,
    cursor: Option<usize>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cache.nodes[self.cursor?].as_ref()?;
        self.cursor = node.next;
        Some(node.key.as_str())
    }
}
