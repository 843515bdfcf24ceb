use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::core::error::StoreError;
use crate::stores::kv::{KvStore, UpdateFn};

/// In-memory KvStore, used for tests and ephemeral deployments
///
/// `update` runs its callback while holding the shard lock for the key, so
/// concurrent writers to the same key are serialized.
pub struct MemoryStore {
    entries: DashMap<(String, String), Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    fn key(table: &str, key: &str) -> (String, String) {
        (table.to_string(), key.to_string())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, table: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .entries
            .get(&Self::key(table, key))
            .map(|entry| entry.value().clone()))
    }

    fn put(&self, table: &str, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(Self::key(table, key), value.to_vec());
        Ok(())
    }

    fn update(&self, table: &str, key: &str, f: &mut UpdateFn<'_>) -> Result<(), StoreError> {
        match self.entries.entry(Self::key(table, key)) {
            Entry::Occupied(mut entry) => {
                let next = f(Some(entry.get().as_slice()))?;
                entry.insert(next);
            }
            Entry::Vacant(entry) => {
                let next = f(None)?;
                entry.insert(next);
            }
        }
        Ok(())
    }

    fn len(&self, table: &str) -> Result<usize, StoreError> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.key().0 == table)
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_tables_are_separate() {
        let store = MemoryStore::new();
        store.put("user", "k", b"a").unwrap();
        store.put("other", "k", b"b").unwrap();

        assert_eq!(store.get("user", "k").unwrap(), Some(b"a".to_vec()));
        assert_eq!(store.get("other", "k").unwrap(), Some(b"b".to_vec()));
        assert_eq!(store.len("user").unwrap(), 1);
        assert!(store.is_empty("missing").unwrap());
    }

    #[test]
    fn test_update_error_leaves_vacant_key() {
        let store = MemoryStore::new();
        let result = store.update("user", "k", &mut |_| Err(StoreError::NotFound("k".into())));

        assert!(result.is_err());
        assert_eq!(store.get("user", "k").unwrap(), None);
    }

    #[test]
    fn test_concurrent_updates_do_not_lose_writes() {
        let store = Arc::new(MemoryStore::new());
        store.put("counter", "n", b"0").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..100 {
                        store
                            .update("counter", "n", &mut |current| {
                                let text = std::str::from_utf8(current.unwrap()).unwrap();
                                let n: u32 = text.parse().unwrap();
                                Ok((n + 1).to_string().into_bytes())
                            })
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get("counter", "n").unwrap(), Some(b"800".to_vec()));
    }
}
