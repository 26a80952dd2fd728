//! Group Registry
//!
//! Name-to-group lookup shared by everything that serves groups.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::error::Result;
use crate::group::{Group, GroupBuilder, Loader};

// == Group Registry ==
/// Registry of groups by name.
///
/// Lookups share a read lock; registration takes the write lock.
/// Registering an existing name replaces the previous group.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // == Register ==
    /// Validates and registers a group built from `builder`.
    pub fn register(&self, builder: GroupBuilder) -> Result<Arc<Group>> {
        let group = Arc::new(builder.build()?);
        self.insert(Arc::clone(&group));
        Ok(group)
    }

    /// Registers a group whose loader is already known to be present.
    pub fn new_group(
        &self,
        name: impl Into<String>,
        cache_bytes: usize,
        loader: impl Loader + 'static,
    ) -> Arc<Group> {
        let group = Arc::new(Group::new(name.into(), cache_bytes, Arc::new(loader)));
        self.insert(Arc::clone(&group));
        group
    }

    fn insert(&self, group: Arc<Group>) {
        let name = group.name().to_string();
        let previous = self.groups.write().insert(name.clone(), group);
        if previous.is_some() {
            warn!(group = %name, "replaced existing group");
        } else {
            info!(group = %name, "group registered");
        }
    }

    // == Lookup ==
    pub fn get(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Registered group names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use crate::group::LoaderFn;
    use std::thread;

    fn echo() -> LoaderFn<impl Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync> {
        LoaderFn(|key: &str| -> anyhow::Result<Vec<u8>> { Ok(key.as_bytes().to_vec()) })
    }

    #[test]
    fn test_registry_lookup() {
        let registry = GroupRegistry::new();
        registry.new_group("scores", 1024, echo());

        let group = registry.get("scores").unwrap();
        assert_eq!(group.name(), "scores");
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_register_requires_loader() {
        let registry = GroupRegistry::new();

        let result = registry.register(Group::builder("scores", 1024));

        assert!(matches!(result, Err(CacheError::Precondition(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registry_reregister_replaces() {
        let registry = GroupRegistry::new();
        let first = registry.new_group("scores", 1024, echo());
        first.get("Tom").unwrap();

        let second = registry
            .register(Group::builder("scores", 1024).loader(echo()))
            .unwrap();

        let current = registry.get("scores").unwrap();
        assert!(Arc::ptr_eq(&current, &second));
        assert!(!Arc::ptr_eq(&current, &first));
        assert!(current.store().is_empty());
        assert_eq!(registry.names(), vec!["scores".to_string()]);
    }

    #[test]
    fn test_registries_are_isolated() {
        let left = GroupRegistry::new();
        let right = GroupRegistry::new();
        left.new_group("scores", 0, echo());

        assert!(left.get("scores").is_some());
        assert!(right.get("scores").is_none());
    }

    #[test]
    fn test_registry_concurrent_register_and_lookup() {
        let registry = Arc::new(GroupRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let name = format!("group{t}");
                    registry.new_group(name.clone(), 0, echo());
                    for _ in 0..100 {
                        assert!(registry.get(&name).is_some());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 8);
    }
}
