//! # Driven Ports (SPI - Outbound)
//!
//! The interface the ledger logic depends on: a key-value store with a
//! predicate-query capability, supplied by the hosting platform. Adapters
//! implement [`StateStore`]; the core never touches storage directly.
//!
//! Writes are staged into a [`WriteBatch`] and applied in one call so the
//! host's commit boundary sees the whole write set of an invocation at once:
//! a unit of work either lands completely or not at all.

use crate::errors::StoreError;
use async_trait::async_trait;
use serde_json::Value;

// =============================================================================
// SELECTOR
// =============================================================================

/// Field-equality predicate over stored JSON documents.
///
/// Models the host store's rich-query capability (a CouchDB-style selector
/// restricted to conjunction of equality clauses, which is all this
/// contract uses).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    clauses: Vec<(String, Value)>,
}

impl Selector {
    /// Starts a selector with a single equality clause.
    pub fn field(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            clauses: vec![(name.into(), value.into())],
        }
    }

    /// Adds another equality clause (conjunction).
    #[must_use]
    pub fn and(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((name.into(), value.into()));
        self
    }

    /// The clauses, in insertion order.
    #[must_use]
    pub fn clauses(&self) -> &[(String, Value)] {
        &self.clauses
    }

    /// Returns true if `doc` satisfies every clause.
    #[must_use]
    pub fn matches(&self, doc: &Value) -> bool {
        self.clauses
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }
}

// =============================================================================
// WRITE BATCH
// =============================================================================

/// Staged write set of one unit of work.
///
/// Operations stage every put here and hand the batch to
/// [`StateStore::apply`] exactly once, at the end; a failure anywhere before
/// that point drops the batch with nothing persisted.
#[derive(Clone, Debug, Default)]
pub struct WriteBatch {
    writes: Vec<(String, Vec<u8>)>,
}

impl WriteBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a put of `value` under `key`.
    pub fn put(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.writes.push((key.into(), value));
    }

    /// Number of staged writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Returns true if nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Consumes the batch, yielding the staged writes in order.
    #[must_use]
    pub fn into_writes(self) -> Vec<(String, Vec<u8>)> {
        self.writes
    }
}

// =============================================================================
// STATE STORE
// =============================================================================

/// Interface to the host-provided state store.
///
/// ## Implementation notes
///
/// - `get` returns `Ok(None)` for an absent key; only infrastructure faults
///   are errors. The service layer decides whether absence is `NotFound`.
/// - `apply` must be atomic: either every write in the batch becomes
///   visible or none does.
/// - `query` returns matches in store-determined order; callers needing a
///   particular order sort client-side.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Point read of the value under `key`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Atomically applies a staged write set.
    async fn apply(&self, batch: WriteBatch) -> Result<(), StoreError>;

    /// Predicate query over stored documents, returning `(key, value)`
    /// pairs for every document matching the selector.
    async fn query(&self, selector: &Selector) -> Result<Vec<(String, Vec<u8>)>, StoreError>;
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_selector_single_clause() {
        let selector = Selector::field("bloodType", "O+");
        assert!(selector.matches(&json!({"bloodType": "O+", "quantity": 2})));
        assert!(!selector.matches(&json!({"bloodType": "AB-"})));
        assert!(!selector.matches(&json!({"quantity": 2})));
    }

    #[test]
    fn test_selector_conjunction() {
        let selector = Selector::field("docType", "usageHistory").and("acceptorID", "A1");
        assert!(selector.matches(&json!({
            "docType": "usageHistory", "acceptorID": "A1", "quantity": 1
        })));
        // A blood unit carrying the same acceptorID must not match.
        assert!(!selector.matches(&json!({
            "docType": "bloodUnit", "acceptorID": "A1"
        })));
    }

    #[test]
    fn test_write_batch_preserves_order() {
        let mut batch = WriteBatch::new();
        assert!(batch.is_empty());
        batch.put("U1", b"unit".to_vec());
        batch.put("history_U1_x", b"history".to_vec());
        assert_eq!(batch.len(), 2);

        let writes = batch.into_writes();
        assert_eq!(writes[0].0, "U1");
        assert_eq!(writes[1].0, "history_U1_x");
    }
}
