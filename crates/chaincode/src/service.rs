//! # Blood Ledger Service
//!
//! Implements [`BloodLedgerApi`] over an injected [`StateStore`]. Every
//! operation is one unit of work: read current state, validate domain rules,
//! stage writes into a [`WriteBatch`], and apply the batch exactly once at
//! the end. A failure anywhere before the apply leaves nothing persisted,
//! and the read-then-validate-then-write ordering keeps the host's
//! commit-time conflict detection able to observe the read set.

use crate::domain::entities::{
    Acceptor, BloodUnit, Document, Donor, InvocationContext, UsageHistory,
};
use crate::domain::invariants::{can_transition, check_acceptance, AcceptanceViolation};
use crate::domain::value_objects::{fields, history_key, DocType, TestResult, UnitStatus};
use crate::errors::{rules, ContractError};
use crate::ports::inbound::BloodLedgerApi;
use crate::ports::outbound::{Selector, StateStore, WriteBatch};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// When true, register/donate calls silently overwrite an existing
    /// record (the original ledger's upsert semantics). Default: false,
    /// duplicate ids are rejected.
    pub allow_overwrite: bool,
    /// When true, the lifecycle machine is enforced: consumption only from
    /// `Tested`/`Partially Used` units, no re-testing of units already in
    /// circulation. When false only quantity rules apply, matching the
    /// original ledger bit for bit. Default: true.
    pub enforce_lifecycle: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            allow_overwrite: false,
            enforce_lifecycle: true,
        }
    }
}

// =============================================================================
// STATISTICS
// =============================================================================

/// Service counters.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Operations invoked (including failed ones).
    pub invocations: u64,
    /// Write batches applied.
    pub commits: u64,
}

// =============================================================================
// SERVICE
// =============================================================================

/// The blood-donation ledger service.
pub struct BloodLedgerService<S: StateStore> {
    config: ServiceConfig,
    store: Arc<S>,
    stats: RwLock<ServiceStats>,
}

impl<S: StateStore> BloodLedgerService<S> {
    /// Creates a service over the given store.
    pub fn new(store: Arc<S>, config: ServiceConfig) -> Self {
        Self {
            config,
            store,
            stats: RwLock::new(ServiceStats::default()),
        }
    }

    /// Current counter snapshot.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    async fn note_invocation(&self) {
        self.stats.write().await.invocations += 1;
    }

    /// Applies a staged write set. The store guarantees all-or-nothing.
    async fn commit(&self, batch: WriteBatch) -> Result<(), ContractError> {
        debug!(writes = batch.len(), "applying write batch");
        self.store.apply(batch).await?;
        self.stats.write().await.commits += 1;
        Ok(())
    }

    /// Reads and decodes a required document, verifying its kind.
    async fn read_required<T>(&self, key: &str) -> Result<T, ContractError>
    where
        T: Document + DeserializeOwned,
    {
        let Some(bytes) = self.store.get(key).await? else {
            return Err(ContractError::not_found(key));
        };
        let doc: T =
            serde_json::from_slice(&bytes).map_err(|e| ContractError::corruption(key, e))?;
        if doc.doc_type() != T::DOC_TYPE {
            return Err(ContractError::corruption(
                key,
                format!(
                    "expected {} document, found {}",
                    T::DOC_TYPE,
                    doc.doc_type()
                ),
            ));
        }
        Ok(doc)
    }

    /// Rejects ids that already hold a record, unless overwrite is allowed.
    async fn ensure_vacant(&self, key: &str) -> Result<(), ContractError> {
        if self.config.allow_overwrite {
            return Ok(());
        }
        if self.store.get(key).await?.is_some() {
            warn!(key, "rejected write to occupied id");
            return Err(ContractError::violation(
                rules::UNIQUE_ID,
                format!("id {key} already holds a record"),
            ));
        }
        Ok(())
    }

    /// Decodes predicate-query rows into typed records.
    fn decode_rows<T: DeserializeOwned>(
        rows: Vec<(String, Vec<u8>)>,
    ) -> Result<Vec<T>, ContractError> {
        rows.into_iter()
            .map(|(key, bytes)| {
                serde_json::from_slice(&bytes).map_err(|e| ContractError::corruption(key.as_str(), e))
            })
            .collect()
    }
}

fn encode<T: Serialize>(key: &str, value: &T) -> Result<Vec<u8>, ContractError> {
    serde_json::to_vec(value).map_err(|e| ContractError::corruption(key, e))
}

fn acceptance_error(violation: &AcceptanceViolation) -> ContractError {
    let rule = match violation {
        AcceptanceViolation::NotTransfusable { .. } => rules::NOT_TRANSFUSABLE,
        AcceptanceViolation::ZeroQuantity => rules::ZERO_QUANTITY,
        AcceptanceViolation::Insufficient { .. } => rules::INSUFFICIENT_QUANTITY,
    };
    ContractError::violation(rule, violation.to_string())
}

// =============================================================================
// API IMPLEMENTATION
// =============================================================================

#[async_trait]
impl<S: StateStore> BloodLedgerApi for BloodLedgerService<S> {
    #[instrument(skip(self, ctx), fields(tx_id = %ctx.tx_id))]
    async fn register_donor(
        &self,
        ctx: &InvocationContext,
        donor_id: &str,
        name: &str,
        blood_type: &str,
    ) -> Result<(), ContractError> {
        self.note_invocation().await;
        self.ensure_vacant(donor_id).await?;

        let donor = Donor::new(donor_id, name, blood_type);
        let mut batch = WriteBatch::new();
        batch.put(donor_id, encode(donor_id, &donor)?);
        self.commit(batch).await?;

        info!(donor_id, blood_type, "registered donor");
        Ok(())
    }

    #[instrument(skip(self, ctx), fields(tx_id = %ctx.tx_id))]
    async fn register_acceptor(
        &self,
        ctx: &InvocationContext,
        acceptor_id: &str,
        name: &str,
        location: &str,
        phone_number: &str,
    ) -> Result<(), ContractError> {
        self.note_invocation().await;
        self.ensure_vacant(acceptor_id).await?;

        let acceptor = Acceptor::new(acceptor_id, name, location, phone_number);
        let mut batch = WriteBatch::new();
        batch.put(acceptor_id, encode(acceptor_id, &acceptor)?);
        self.commit(batch).await?;

        info!(acceptor_id, location, "registered acceptor");
        Ok(())
    }

    #[instrument(skip(self, ctx))]
    async fn query_donor(
        &self,
        ctx: &InvocationContext,
        donor_id: &str,
    ) -> Result<Donor, ContractError> {
        self.note_invocation().await;
        self.read_required(donor_id).await
    }

    #[instrument(skip(self, ctx))]
    async fn query_acceptor(
        &self,
        ctx: &InvocationContext,
        acceptor_id: &str,
    ) -> Result<Acceptor, ContractError> {
        self.note_invocation().await;
        self.read_required(acceptor_id).await
    }

    #[instrument(skip(self, ctx), fields(tx_id = %ctx.tx_id))]
    async fn record_donation(
        &self,
        ctx: &InvocationContext,
        unit_id: &str,
        donor_id: &str,
        blood_type: &str,
        quantity: u32,
        hospital_name: &str,
        acceptor_id: Option<&str>,
    ) -> Result<(), ContractError> {
        self.note_invocation().await;
        self.ensure_vacant(unit_id).await?;

        let unit = BloodUnit::new_collected(
            unit_id,
            donor_id,
            blood_type,
            quantity,
            hospital_name,
            acceptor_id.map(str::to_string),
            ctx.wire_date(),
        );
        let mut batch = WriteBatch::new();
        batch.put(unit_id, encode(unit_id, &unit)?);
        self.commit(batch).await?;

        info!(unit_id, donor_id, blood_type, quantity, "recorded donation");
        Ok(())
    }

    #[instrument(skip(self, ctx), fields(tx_id = %ctx.tx_id))]
    async fn test_blood(
        &self,
        ctx: &InvocationContext,
        unit_id: &str,
        result: TestResult,
    ) -> Result<(), ContractError> {
        self.note_invocation().await;
        let mut unit: BloodUnit = self.read_required(unit_id).await?;

        let target = if result.is_safe() {
            UnitStatus::Tested
        } else {
            UnitStatus::Unsafe
        };
        // Repeating a test with the same classification is idempotent even
        // from a terminal status; anything else must be a legal transition.
        if self.config.enforce_lifecycle
            && unit.status != target
            && !can_transition(unit.status, target)
        {
            return Err(ContractError::violation(
                rules::INVALID_TRANSITION,
                format!("cannot move unit {unit_id} from {} to {target}", unit.status),
            ));
        }

        unit.apply_test(result);
        let mut batch = WriteBatch::new();
        batch.put(unit_id, encode(unit_id, &unit)?);
        self.commit(batch).await?;

        info!(unit_id, status = %unit.status, "recorded test result");
        Ok(())
    }

    #[instrument(skip(self, ctx), fields(tx_id = %ctx.tx_id))]
    async fn accept_blood(
        &self,
        ctx: &InvocationContext,
        unit_id: &str,
        acceptor_id: &str,
        quantity: u32,
    ) -> Result<(), ContractError> {
        self.note_invocation().await;
        let mut unit: BloodUnit = self.read_required(unit_id).await?;

        check_acceptance(&unit, quantity, self.config.enforce_lifecycle)
            .map_err(|v| acceptance_error(&v))?;

        unit.debit(quantity, acceptor_id);
        let history = UsageHistory::new(unit_id, acceptor_id, quantity, ctx.wire_date());
        let key = history_key(unit_id, ctx.tx_id);

        // Unit update and history append share one batch: both land or
        // neither does.
        let mut batch = WriteBatch::new();
        batch.put(unit_id, encode(unit_id, &unit)?);
        batch.put(key.as_str(), encode(&key, &history)?);
        self.commit(batch).await?;

        info!(
            unit_id,
            acceptor_id,
            quantity,
            remaining = unit.quantity,
            status = %unit.status,
            "accepted blood"
        );
        Ok(())
    }

    #[instrument(skip(self, ctx), fields(tx_id = %ctx.tx_id))]
    async fn use_blood(
        &self,
        ctx: &InvocationContext,
        unit_id: &str,
    ) -> Result<(), ContractError> {
        self.note_invocation().await;
        let mut unit: BloodUnit = self.read_required(unit_id).await?;

        unit.status = UnitStatus::Used;
        let mut batch = WriteBatch::new();
        batch.put(unit_id, encode(unit_id, &unit)?);
        self.commit(batch).await?;

        info!(unit_id, "marked unit used");
        Ok(())
    }

    #[instrument(skip(self, ctx))]
    async fn query_blood_unit(
        &self,
        ctx: &InvocationContext,
        unit_id: &str,
    ) -> Result<BloodUnit, ContractError> {
        self.note_invocation().await;
        self.read_required(unit_id).await
    }

    #[instrument(skip(self, ctx))]
    async fn query_usage_history(
        &self,
        ctx: &InvocationContext,
        acceptor_id: &str,
    ) -> Result<Vec<UsageHistory>, ContractError> {
        self.note_invocation().await;
        let selector = Selector::field(fields::DOC_TYPE, DocType::UsageHistory.as_str())
            .and(fields::ACCEPTOR_ID, acceptor_id);
        let rows = self.store.query(&selector).await?;
        Self::decode_rows(rows)
    }

    #[instrument(skip(self, ctx))]
    async fn query_blood_units_by_type(
        &self,
        ctx: &InvocationContext,
        blood_type: &str,
    ) -> Result<Vec<BloodUnit>, ContractError> {
        self.note_invocation().await;
        let selector = Selector::field(fields::DOC_TYPE, DocType::BloodUnit.as_str())
            .and(fields::BLOOD_TYPE, blood_type);
        let rows = self.store.query(&selector).await?;
        Self::decode_rows(rows)
    }

    #[instrument(skip(self, ctx))]
    async fn query_donation_history(
        &self,
        ctx: &InvocationContext,
        donor_id: &str,
    ) -> Result<Vec<BloodUnit>, ContractError> {
        self.note_invocation().await;
        let selector = Selector::field(fields::DOC_TYPE, DocType::BloodUnit.as_str())
            .and(fields::DONOR_ID, donor_id);
        let rows = self.store.query(&selector).await?;
        Self::decode_rows(rows)
    }
}

// =============================================================================
// TESTS
// =============================================================================
