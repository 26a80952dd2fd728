//! Source Loader
//!
//! The authoritative data source a group falls back to on a miss.

use std::fmt;
use std::sync::Arc;

// == Loader ==
/// Loads the authoritative bytes for a key.
///
/// Concurrent misses for one key may call `load` more than once, so
/// implementations should be idempotent.
pub trait Loader: Send + Sync {
    fn load(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

impl<L: Loader + ?Sized> Loader for Arc<L> {
    fn load(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (**self).load(key)
    }
}

// == Loader Fn ==
/// Adapts a closure into a [`Loader`].
pub struct LoaderFn<F>(pub F);

impl<F> Loader for LoaderFn<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    fn load(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (self.0)(key)
    }
}

impl<F> fmt::Debug for LoaderFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LoaderFn")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_fn_forwards() {
        let loader = LoaderFn(|key: &str| -> anyhow::Result<Vec<u8>> { Ok(key.as_bytes().to_vec()) });
        assert_eq!(loader.load("key").unwrap(), b"key".to_vec());
    }

    #[test]
    fn test_loader_fn_propagates_error() {
        let loader = LoaderFn(|key: &str| -> anyhow::Result<Vec<u8>> {
            anyhow::bail!("{key} not exist")
        });
        let err = loader.load("Tom").unwrap_err();
        assert_eq!(err.to_string(), "Tom not exist");
    }
}
