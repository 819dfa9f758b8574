//! # Driving Ports (API - Inbound)
//!
//! The public surface of the ledger: entity registry, inventory lifecycle,
//! usage-history log, and the predicate-query façade. The hosting platform
//! invokes these through the string-argument dispatch boundary in
//! [`crate::invocation`]; in-process callers use the trait directly.

use crate::domain::entities::{Acceptor, BloodUnit, Donor, InvocationContext, UsageHistory};
use crate::domain::value_objects::TestResult;
use crate::errors::ContractError;
use async_trait::async_trait;

// =============================================================================
// BLOOD LEDGER API
// =============================================================================

/// Primary API of the blood-donation ledger.
///
/// Every method executes as one unit of work against the state store: all
/// writes of a call commit together or not at all. The `ctx` argument
/// carries the invocation's transaction id and timestamp.
#[async_trait]
pub trait BloodLedgerApi: Send + Sync {
    // ---- Entity registry ----------------------------------------------------

    /// Registers a new donor under `donor_id`.
    async fn register_donor(
        &self,
        ctx: &InvocationContext,
        donor_id: &str,
        name: &str,
        blood_type: &str,
    ) -> Result<(), ContractError>;

    /// Registers a new acceptor (hospital) under `acceptor_id`.
    async fn register_acceptor(
        &self,
        ctx: &InvocationContext,
        acceptor_id: &str,
        name: &str,
        location: &str,
        phone_number: &str,
    ) -> Result<(), ContractError>;

    /// Point lookup of a donor. Fails `NotFound` if absent.
    async fn query_donor(
        &self,
        ctx: &InvocationContext,
        donor_id: &str,
    ) -> Result<Donor, ContractError>;

    /// Point lookup of an acceptor. Fails `NotFound` if absent.
    async fn query_acceptor(
        &self,
        ctx: &InvocationContext,
        acceptor_id: &str,
    ) -> Result<Acceptor, ContractError>;

    // ---- Inventory ledger ---------------------------------------------------

    /// Records a donation: creates a blood unit in `Collected` status with
    /// the given quantity and the invocation timestamp as collection date.
    #[allow(clippy::too_many_arguments)]
    async fn record_donation(
        &self,
        ctx: &InvocationContext,
        unit_id: &str,
        donor_id: &str,
        blood_type: &str,
        quantity: u32,
        hospital_name: &str,
        acceptor_id: Option<&str>,
    ) -> Result<(), ContractError>;

    /// Applies a laboratory result to a unit: `Tested` for `"Safe"`,
    /// `Unsafe` for anything else.
    async fn test_blood(
        &self,
        ctx: &InvocationContext,
        unit_id: &str,
        result: TestResult,
    ) -> Result<(), ContractError>;

    /// Consumes `quantity` from a unit on behalf of `acceptor_id` and
    /// appends one usage-history record. Unit update and history append
    /// share the invocation's unit of work.
    async fn accept_blood(
        &self,
        ctx: &InvocationContext,
        unit_id: &str,
        acceptor_id: &str,
        quantity: u32,
    ) -> Result<(), ContractError>;

    /// Unconditionally marks a unit `Used`, independent of remaining
    /// quantity.
    async fn use_blood(&self, ctx: &InvocationContext, unit_id: &str)
        -> Result<(), ContractError>;

    /// Point lookup of a blood unit. Fails `NotFound` if absent.
    async fn query_blood_unit(
        &self,
        ctx: &InvocationContext,
        unit_id: &str,
    ) -> Result<BloodUnit, ContractError>;

    // ---- Usage history log --------------------------------------------------

    /// All consumption events recorded for `acceptor_id`, in
    /// store-determined order.
    async fn query_usage_history(
        &self,
        ctx: &InvocationContext,
        acceptor_id: &str,
    ) -> Result<Vec<UsageHistory>, ContractError>;

    // ---- Query façade -------------------------------------------------------

    /// All blood units of the given blood type, order unspecified.
    async fn query_blood_units_by_type(
        &self,
        ctx: &InvocationContext,
        blood_type: &str,
    ) -> Result<Vec<BloodUnit>, ContractError>;

    /// All blood units donated by `donor_id`, order unspecified.
    async fn query_donation_history(
        &self,
        ctx: &InvocationContext,
        donor_id: &str,
    ) -> Result<Vec<BloodUnit>, ContractError>;
}
