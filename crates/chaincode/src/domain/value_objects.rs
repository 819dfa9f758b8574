//! # Value Objects
//!
//! Small immutable types shared across the domain: the unit lifecycle status,
//! the test-result wrapper, the document-type discriminator, and the wire
//! field names used by predicate queries.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// UNIT STATUS
// =============================================================================

/// Lifecycle status of a blood unit.
///
/// The wire strings are a compatibility contract and must not change:
/// `"Collected"`, `"Tested"`, `"Unsafe"`, `"Partially Used"`, `"Used"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitStatus {
    /// Freshly donated, not yet tested.
    Collected,
    /// Tested safe, available for transfusion.
    Tested,
    /// Failed testing. Terminal.
    Unsafe,
    /// Some quantity consumed, some remaining.
    #[serde(rename = "Partially Used")]
    PartiallyUsed,
    /// Fully consumed. Terminal.
    Used,
}

impl UnitStatus {
    /// Returns true if no further transitions are possible.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Used | Self::Unsafe)
    }

    /// Returns true if units in this status may be consumed.
    #[must_use]
    pub fn is_transfusable(self) -> bool {
        matches!(self, Self::Tested | Self::PartiallyUsed)
    }

    /// Wire representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Collected => "Collected",
            Self::Tested => "Tested",
            Self::Unsafe => "Unsafe",
            Self::PartiallyUsed => "Partially Used",
            Self::Used => "Used",
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// TEST RESULT
// =============================================================================

/// Laboratory test result for a blood unit.
///
/// The literal `"Safe"` marks a unit safe; any other string (e.g.
/// `"Contaminated"`, `"Expired"`) marks it unsafe. The raw string is
/// preserved on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestResult(String);

impl TestResult {
    /// The literal that classifies a unit as safe.
    pub const SAFE: &'static str = "Safe";

    /// Wraps a raw result string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns true if the result marks the unit safe for use.
    #[must_use]
    pub fn is_safe(&self) -> bool {
        self.0 == Self::SAFE
    }

    /// The raw result string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TestResult {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

// =============================================================================
// DOCUMENT TYPE
// =============================================================================

/// Discriminator stored in every document under the `docType` field.
///
/// Predicate queries select on this field first; without it a selector like
/// `acceptorID == X` would match blood-unit documents as well as
/// usage-history documents, since both carry that field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocType {
    /// A registered donor.
    #[serde(rename = "donor")]
    Donor,
    /// A registered acceptor (hospital).
    #[serde(rename = "acceptor")]
    Acceptor,
    /// A blood unit in inventory.
    #[serde(rename = "bloodUnit")]
    BloodUnit,
    /// An append-only consumption record.
    #[serde(rename = "usageHistory")]
    UsageHistory,
}

impl DocType {
    /// Wire representation, as used in selectors.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Donor => "donor",
            Self::Acceptor => "acceptor",
            Self::BloodUnit => "bloodUnit",
            Self::UsageHistory => "usageHistory",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// WIRE FIELD NAMES
// =============================================================================

/// JSON field names used in selectors. These mirror the serde renames on the
/// entity structs and are part of the stored-document compatibility contract.
pub mod fields {
    /// Document-type discriminator.
    pub const DOC_TYPE: &str = "docType";
    /// Donor identifier.
    pub const DONOR_ID: &str = "donorID";
    /// Acceptor identifier.
    pub const ACCEPTOR_ID: &str = "acceptorID";
    /// Blood type (e.g. `"O+"`).
    pub const BLOOD_TYPE: &str = "bloodType";
}

// =============================================================================
// KEYS
// =============================================================================

/// Key under which a consumption event is stored.
///
/// The original ledger keyed history records by second-resolution timestamp,
/// which collides when two acceptances of the same unit land in the same
/// second; the invocation's transaction id is collision-free.
#[must_use]
pub fn history_key(unit_id: &str, tx_id: Uuid) -> String {
    format!("history_{unit_id}_{tx_id}")
}

/// Wire format for `date` fields, matching the original ledger's documents.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// TESTS
// =============================================================================
