//! # Core Domain Entities
//!
//! The four record shapes persisted to the state store, plus the invocation
//! context that supplies the transaction id and timestamp for one unit of
//! work. Field names on the wire are a compatibility contract (`donorID`,
//! `acceptorID`, `unitID`, `bloodType`, `phoneNumber`, `hospitalName`,
//! `quantity`, `status`, `testResult`, `date`) and are pinned with serde
//! renames.

use crate::domain::value_objects::{DocType, TestResult, UnitStatus, DATE_FORMAT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// DOCUMENT TRAIT
// =============================================================================

/// Marker for types stored as JSON documents in the state store.
///
/// Point reads use [`Document::DOC_TYPE`] to verify that the key actually
/// holds the expected kind of record; a mismatch is surfaced as data
/// corruption rather than silently decoding overlapping fields.
pub trait Document {
    /// Discriminator this document kind is stored under.
    const DOC_TYPE: DocType;

    /// Discriminator found in this instance.
    fn doc_type(&self) -> DocType;
}

// =============================================================================
// INVOCATION CONTEXT
// =============================================================================

/// Per-invocation context: one atomic unit of work against the store.
///
/// The hosting platform assigns each invocation a transaction id and a
/// timestamp; both are fixed for the whole operation so that repeated reads
/// of "now" inside a single call agree.
#[derive(Clone, Debug)]
pub struct InvocationContext {
    /// Transaction id for this invocation.
    pub tx_id: Uuid,
    /// Invocation timestamp.
    pub timestamp: DateTime<Utc>,
}

impl InvocationContext {
    /// Creates a context with a fresh transaction id and the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tx_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        }
    }

    /// Creates a context with explicit id and timestamp (host-supplied, or a
    /// fixed point in tests).
    #[must_use]
    pub fn at(tx_id: Uuid, timestamp: DateTime<Utc>) -> Self {
        Self { tx_id, timestamp }
    }

    /// The timestamp in the wire `date` format.
    #[must_use]
    pub fn wire_date(&self) -> String {
        self.timestamp.format(DATE_FORMAT).to_string()
    }
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// DONOR
// =============================================================================

/// A registered blood donor. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donor {
    /// Document-type discriminator.
    #[serde(rename = "docType")]
    pub doc_type: DocType,
    /// Unique donor id, also the storage key.
    #[serde(rename = "donorID")]
    pub donor_id: String,
    /// Donor name.
    pub name: String,
    /// Donor blood type, free-form (e.g. `"O+"`).
    #[serde(rename = "bloodType")]
    pub blood_type: String,
}

impl Donor {
    /// Creates a donor record.
    pub fn new(
        donor_id: impl Into<String>,
        name: impl Into<String>,
        blood_type: impl Into<String>,
    ) -> Self {
        Self {
            doc_type: DocType::Donor,
            donor_id: donor_id.into(),
            name: name.into(),
            blood_type: blood_type.into(),
        }
    }
}

impl Document for Donor {
    const DOC_TYPE: DocType = DocType::Donor;

    fn doc_type(&self) -> DocType {
        self.doc_type
    }
}

// =============================================================================
// ACCEPTOR
// =============================================================================

/// A registered acceptor (hospital). Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acceptor {
    /// Document-type discriminator.
    #[serde(rename = "docType")]
    pub doc_type: DocType,
    /// Unique acceptor id, also the storage key.
    #[serde(rename = "acceptorID")]
    pub acceptor_id: String,
    /// Hospital name.
    pub name: String,
    /// Hospital location.
    pub location: String,
    /// Contact phone number.
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
}

impl Acceptor {
    /// Creates an acceptor record.
    pub fn new(
        acceptor_id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            doc_type: DocType::Acceptor,
            acceptor_id: acceptor_id.into(),
            name: name.into(),
            location: location.into(),
            phone_number: phone_number.into(),
        }
    }
}

impl Document for Acceptor {
    const DOC_TYPE: DocType = DocType::Acceptor;

    fn doc_type(&self) -> DocType {
        self.doc_type
    }
}

// =============================================================================
// BLOOD UNIT
// =============================================================================

/// A unit of donated blood moving through the inventory lifecycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodUnit {
    /// Document-type discriminator.
    #[serde(rename = "docType")]
    pub doc_type: DocType,
    /// Unique unit id, also the storage key.
    #[serde(rename = "unitID")]
    pub unit_id: String,
    /// Donating party.
    #[serde(rename = "donorID")]
    pub donor_id: String,
    /// Accepting party; set at donation if pre-assigned, otherwise on first
    /// acceptance.
    #[serde(rename = "acceptorID", default, skip_serializing_if = "Option::is_none")]
    pub acceptor_id: Option<String>,
    /// Blood type of the unit.
    #[serde(rename = "bloodType")]
    pub blood_type: String,
    /// Remaining quantity. Non-negative by construction.
    pub quantity: u32,
    /// Lifecycle status.
    pub status: UnitStatus,
    /// Laboratory result, absent until the unit is tested.
    #[serde(rename = "testResult", default, skip_serializing_if = "Option::is_none")]
    pub test_result: Option<TestResult>,
    /// Collecting hospital.
    #[serde(rename = "hospitalName")]
    pub hospital_name: String,
    /// Collection date, wire format `%Y-%m-%d %H:%M:%S`.
    pub date: String,
}

impl BloodUnit {
    /// Creates a freshly collected unit.
    #[allow(clippy::too_many_arguments)]
    pub fn new_collected(
        unit_id: impl Into<String>,
        donor_id: impl Into<String>,
        blood_type: impl Into<String>,
        quantity: u32,
        hospital_name: impl Into<String>,
        acceptor_id: Option<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            doc_type: DocType::BloodUnit,
            unit_id: unit_id.into(),
            donor_id: donor_id.into(),
            acceptor_id,
            blood_type: blood_type.into(),
            quantity,
            status: UnitStatus::Collected,
            test_result: None,
            hospital_name: hospital_name.into(),
            date: date.into(),
        }
    }

    /// Applies a laboratory result: status becomes `Tested` for a safe
    /// result, `Unsafe` for anything else.
    pub fn apply_test(&mut self, result: TestResult) {
        self.status = if result.is_safe() {
            UnitStatus::Tested
        } else {
            UnitStatus::Unsafe
        };
        self.test_result = Some(result);
    }

    /// Debits `quantity` units and moves the status accordingly: `Used`
    /// when nothing remains, `Partially Used` otherwise. The acceptor id is
    /// recorded on first acceptance and kept thereafter.
    ///
    /// Callers must have validated the request (see
    /// [`crate::domain::invariants::check_acceptance`]); debiting more than
    /// the remaining quantity would wrap and panics in debug builds, so this
    /// saturates as a last line of defense.
    pub fn debit(&mut self, quantity: u32, acceptor_id: &str) {
        self.quantity = self.quantity.saturating_sub(quantity);
        if self.acceptor_id.is_none() {
            self.acceptor_id = Some(acceptor_id.to_string());
        }
        self.status = if self.quantity == 0 {
            UnitStatus::Used
        } else {
            UnitStatus::PartiallyUsed
        };
    }
}

impl Document for BloodUnit {
    const DOC_TYPE: DocType = DocType::BloodUnit;

    fn doc_type(&self) -> DocType {
        self.doc_type
    }
}

// =============================================================================
// USAGE HISTORY
// =============================================================================

/// Append-only record of one consumption event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageHistory {
    /// Document-type discriminator.
    #[serde(rename = "docType")]
    pub doc_type: DocType,
    /// The unit consumed from.
    #[serde(rename = "unitID")]
    pub unit_id: String,
    /// The accepting party.
    #[serde(rename = "acceptorID")]
    pub acceptor_id: String,
    /// Quantity consumed in this event.
    pub quantity: u32,
    /// Date of consumption, wire format `%Y-%m-%d %H:%M:%S`.
    pub date: String,
}

impl UsageHistory {
    /// Creates a consumption record.
    pub fn new(
        unit_id: impl Into<String>,
        acceptor_id: impl Into<String>,
        quantity: u32,
        date: impl Into<String>,
    ) -> Self {
        Self {
            doc_type: DocType::UsageHistory,
            unit_id: unit_id.into(),
            acceptor_id: acceptor_id.into(),
            quantity,
            date: date.into(),
        }
    }
}

impl Document for UsageHistory {
    const DOC_TYPE: DocType = DocType::UsageHistory;

    fn doc_type(&self) -> DocType {
        self.doc_type
    }
}

// =============================================================================
// TESTS
// =============================================================================
