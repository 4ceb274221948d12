use super::{AccessorStrategy, Getter, ParameterGetter, Setter};

use rowmap_core::{Result, Type};

use std::{
    collections::HashMap,
    hash::Hash,
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

pub(super) static GETTERS: LazyLock<Cache<Arc<dyn Getter>>> = LazyLock::new(Cache::new);
pub(super) static SETTERS: LazyLock<Cache<Arc<dyn Setter>>> = LazyLock::new(Cache::new);
pub(super) static PARAMETERS: LazyLock<Cache<Arc<ParameterGetter>>> = LazyLock::new(Cache::new);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) struct Key {
    strategy: AccessorStrategy,
    root: Root,
    path: Box<str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Root {
    Type(Type),
    Parameters(Box<[Type]>),
}

impl Key {
    pub(super) fn new(strategy: AccessorStrategy, root: &Type, path: &str) -> Key {
        Key {
            strategy,
            root: Root::Type(root.clone()),
            path: path.into(),
        }
    }

    pub(super) fn parameters(strategy: AccessorStrategy, params: &[Type], path: &str) -> Key {
        Key {
            strategy,
            root: Root::Parameters(params.into()),
            path: path.into(),
        }
    }
}

/// Process-wide map of built accessors.
///
/// Builds run outside the lock. When two callers race on the same key both
/// may build, but only the first insert is published and every caller gets
/// that instance.
pub(super) struct Cache<V> {
    entries: RwLock<HashMap<Key, V>>,
}

impl<V: Clone> Cache<V> {
    fn new() -> Cache<V> {
        Cache {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub(super) fn get_or_try_insert_with(
        &self,
        key: Key,
        build: impl FnOnce() -> Result<V>,
    ) -> Result<V> {
        if let Some(found) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(found.clone());
        }

        let built = build()?;

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.entry(key).or_insert(built).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn first_published_value_wins() {
        let cache: Cache<Arc<usize>> = Cache::new();
        let key = || Key::new(AccessorStrategy::Compiled, &Type::I32, "x");

        let first = cache.get_or_try_insert_with(key(), || Ok(Arc::new(1))).unwrap();
        let second = cache.get_or_try_insert_with(key(), || Ok(Arc::new(2))).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*second, 1);
    }

    #[test]
    fn failed_builds_are_not_cached() {
        let cache: Cache<Arc<usize>> = Cache::new();
        let builds = AtomicUsize::new(0);
        let key = || Key::new(AccessorStrategy::Reflective, &Type::I32, "y");

        for _ in 0..2 {
            let result = cache.get_or_try_insert_with(key(), || {
                builds.fetch_add(1, Ordering::SeqCst);
                Err(rowmap_core::Error::from_args(format_args!("boom")))
            });
            assert!(result.is_err());
        }

        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn concurrent_first_use_publishes_one_instance() {
        let cache: Cache<Arc<usize>> = Cache::new();
        let key = || Key::new(AccessorStrategy::Compiled, &Type::String, "z");

        let values: Vec<Arc<usize>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let cache = &cache;
                    scope.spawn(move || {
                        cache
                            .get_or_try_insert_with(key(), || Ok(Arc::new(i)))
                            .unwrap()
                    })
                })
                .collect();

            handles.into_iter().map(|handle| handle.join().unwrap()).collect()
        });

        assert!(values.iter().all(|value| Arc::ptr_eq(value, &values[0])));
    }
}
