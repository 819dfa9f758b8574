//! # Domain Invariants
//!
//! The blood-unit lifecycle machine and the acceptance preconditions.
//!
//! Lifecycle:
//!
//! ```text
//! Collected ──► Tested ──► Partially Used ──► Used
//!     │            │              │
//!     ▼            └──────────────┴─────────► Used
//!  Unsafe (terminal)
//! ```
//!
//! `Used` and `Unsafe` are terminal. Consumption is only legal from
//! `Tested` or `Partially Used`.

use crate::domain::entities::BloodUnit;
use crate::domain::value_objects::UnitStatus;
use std::fmt;

// =============================================================================
// TRANSITION PREDICATE
// =============================================================================

/// Returns true if `from -> to` is a legal lifecycle transition.
///
/// Self-transitions are legal where an operation is idempotent: re-testing
/// with the same classification and re-debiting a partially used unit both
/// land on the current status.
#[must_use]
pub fn can_transition(from: UnitStatus, to: UnitStatus) -> bool {
    use UnitStatus::{Collected, PartiallyUsed, Tested, Unsafe, Used};
    match from {
        Collected => matches!(to, Tested | Unsafe),
        // A tested unit may be re-classified on a repeat test (recall path)
        // or move into consumption.
        Tested => matches!(to, Tested | Unsafe | PartiallyUsed | Used),
        PartiallyUsed => matches!(to, PartiallyUsed | Used),
        Used | Unsafe => false,
    }
}

// =============================================================================
// ACCEPTANCE PRECONDITIONS
// =============================================================================

/// Why an acceptance request was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AcceptanceViolation {
    /// The unit's status does not permit consumption.
    NotTransfusable {
        /// Current status of the unit.
        status: UnitStatus,
    },
    /// Zero units were requested.
    ZeroQuantity,
    /// More was requested than remains.
    Insufficient {
        /// Quantity remaining on the unit.
        available: u32,
        /// Quantity requested.
        requested: u32,
    },
}

impl fmt::Display for AcceptanceViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotTransfusable { status } => {
                write!(f, "unit is not transfusable in status {status}")
            }
            Self::ZeroQuantity => write!(f, "requested quantity must be positive"),
            Self::Insufficient {
                available,
                requested,
            } => write!(
                f,
                "insufficient quantity available: available {available}, requested {requested}"
            ),
        }
    }
}

/// Validates an acceptance request against a unit.
///
/// `enforce_lifecycle` gates the status check: when false, only the quantity
/// rules apply (the original ledger's behavior, which happily consumed from
/// untested and unsafe units).
pub fn check_acceptance(
    unit: &BloodUnit,
    requested: u32,
    enforce_lifecycle: bool,
) -> Result<(), AcceptanceViolation> {
    if enforce_lifecycle && !unit.status.is_transfusable() {
        return Err(AcceptanceViolation::NotTransfusable {
            status: unit.status,
        });
    }
    if requested == 0 {
        return Err(AcceptanceViolation::ZeroQuantity);
    }
    if requested > unit.quantity {
        return Err(AcceptanceViolation::Insufficient {
            available: unit.quantity,
            requested,
        });
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
