//! # State Adapter
//!
//! In-memory state store for tests and local runs. The production adapter is
//! the hosting platform's ledger; this one reproduces its observable
//! contract: point reads, an atomic write-batch apply, and selector queries
//! over the stored JSON documents.

use crate::errors::StoreError;
use crate::ports::outbound::{Selector, StateStore, WriteBatch};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// In-memory state store.
///
/// A `BTreeMap` backing gives deterministic (key-ordered) query results,
/// which keeps tests stable; callers must still treat query order as
/// unspecified.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    records: RwLock<BTreeMap<String, Vec<u8>>>,
    /// When set, every operation fails `Unavailable` (fault injection).
    unavailable: AtomicBool,
}

impl InMemoryStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plants a raw value under a key, bypassing the batch path. Test hook
    /// for seeding corrupt or foreign documents.
    pub fn insert_raw(&self, key: impl Into<String>, value: Vec<u8>) {
        self.records.write().unwrap().insert(key.into(), value);
    }

    /// Toggles fault injection: while set, all operations fail with
    /// [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected fault".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.check_available()?;
        Ok(self.records.read().unwrap().get(key).cloned())
    }

    async fn apply(&self, batch: WriteBatch) -> Result<(), StoreError> {
        self.check_available()?;
        // Single lock acquisition: the whole batch lands at once.
        let mut records = self.records.write().unwrap();
        for (key, value) in batch.into_writes() {
            records.insert(key, value);
        }
        Ok(())
    }

    async fn query(&self, selector: &Selector) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        self.check_available()?;
        let records = self.records.read().unwrap();
        let mut matches = Vec::new();
        for (key, value) in records.iter() {
            // Documents that are not JSON objects cannot satisfy an
            // equality selector; skip them rather than failing the scan.
            let Ok(doc) = serde_json::from_slice::<Value>(value) else {
                continue;
            };
            if selector.matches(&doc) {
                matches.push((key.clone(), value.clone()));
            }
        }
        Ok(matches)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_absent_is_none() {
        let store = InMemoryStateStore::new();
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_apply_batch_lands_all_writes() {
        let store = InMemoryStateStore::new();
        let mut batch = WriteBatch::new();
        batch.put("a", b"1".to_vec());
        batch.put("b", b"2".to_vec());
        store.apply(batch).await.unwrap();

        assert_eq!(store.get("a").await.unwrap().unwrap(), b"1");
        assert_eq!(store.get("b").await.unwrap().unwrap(), b"2");
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_query_matches_selector() {
        let store = InMemoryStateStore::new();
        store.insert_raw("U1", serde_json::to_vec(&json!({"bloodType": "O+"})).unwrap());
        store.insert_raw("U2", serde_json::to_vec(&json!({"bloodType": "AB-"})).unwrap());
        store.insert_raw("junk", b"not json".to_vec());

        let hits = store.query(&Selector::field("bloodType", "O+")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "U1");
    }

    #[tokio::test]
    async fn test_fault_injection() {
        let store = InMemoryStateStore::new();
        store.set_unavailable(true);

        assert!(matches!(
            store.get("a").await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            store.apply(WriteBatch::new()).await,
            Err(StoreError::Unavailable(_))
        ));

        store.set_unavailable(false);
        assert!(store.get("a").await.is_ok());
    }
}
