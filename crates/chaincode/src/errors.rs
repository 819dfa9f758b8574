//! # Error Types
//!
//! Failure taxonomy for ledger operations. Every public operation resolves to
//! one of four conditions: a missing required key, a malformed stored
//! document, a broken domain rule, or a transient store fault. Nothing is
//! retried or suppressed internally; the enclosing unit of work is discarded
//! on any failure.

use thiserror::Error;

// =============================================================================
// STORE ERRORS
// =============================================================================

/// Errors from the outbound state-store port.
///
/// Missing keys are NOT an error at this level; `StateStore::get` returns
/// `Ok(None)` and the service layer decides whether absence is a failure.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    /// The backing store could not be reached or refused the request.
    #[error("state store unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// CONTRACT ERRORS
// =============================================================================

/// Errors surfaced by ledger operations.
#[derive(Debug, Error)]
pub enum ContractError {
    /// A required record does not exist.
    #[error("record not found: {key}")]
    NotFound {
        /// The key whose read came back empty.
        key: String,
    },

    /// A stored document could not be decoded (or a record could not be
    /// encoded for storage).
    #[error("malformed record at {key}: {reason}")]
    DataCorruption {
        /// The key holding the malformed document.
        key: String,
        /// Decoder/encoder diagnostic.
        reason: String,
    },

    /// A domain precondition was violated.
    #[error("domain rule violated ({rule}): {details}")]
    DomainViolation {
        /// Stable rule identifier, see [`rules`].
        rule: &'static str,
        /// Human-readable description of the violation.
        details: String,
    },

    /// Transient infrastructure fault, propagated unmodified.
    #[error("state store unavailable")]
    StoreUnavailable(#[from] StoreError),
}

impl ContractError {
    /// Shorthand for [`ContractError::NotFound`].
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Shorthand for [`ContractError::DataCorruption`].
    pub fn corruption(key: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::DataCorruption {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Shorthand for [`ContractError::DomainViolation`].
    pub fn violation(rule: &'static str, details: impl Into<String>) -> Self {
        Self::DomainViolation {
            rule,
            details: details.into(),
        }
    }

    /// Returns true if this is a domain-rule violation (as opposed to an
    /// infrastructure or data fault).
    #[must_use]
    pub fn is_domain_violation(&self) -> bool {
        matches!(self, Self::DomainViolation { .. })
    }
}

// =============================================================================
// RULE IDENTIFIERS
// =============================================================================

/// Stable identifiers for domain rules, carried in
/// [`ContractError::DomainViolation`].
pub mod rules {
    /// A register/donate call targeted an id that already holds a record.
    pub const UNIQUE_ID: &str = "unique-id";
    /// An acceptance requested more than the remaining quantity.
    pub const INSUFFICIENT_QUANTITY: &str = "insufficient-quantity";
    /// An acceptance requested zero units.
    pub const ZERO_QUANTITY: &str = "zero-quantity";
    /// The unit's status does not permit consumption.
    pub const NOT_TRANSFUSABLE: &str = "not-transfusable";
    /// The requested status change is not a legal lifecycle transition.
    pub const INVALID_TRANSITION: &str = "invalid-transition";
    /// An invocation-boundary argument could not be parsed or was missing.
    pub const BAD_ARGUMENT: &str = "bad-argument";
    /// The invocation named a function this contract does not export.
    pub const UNKNOWN_FUNCTION: &str = "unknown-function";
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ContractError::not_found("U404");
        assert_eq!(err.to_string(), "record not found: U404");

        let err = ContractError::violation(rules::INSUFFICIENT_QUANTITY, "available 1, requested 3");
        assert!(err.to_string().contains("insufficient-quantity"));
        assert!(err.to_string().contains("requested 3"));
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::Unavailable("connection reset".into());
        let err: ContractError = store_err.into();
        assert!(matches!(err, ContractError::StoreUnavailable(_)));
        assert!(!err.is_domain_violation());
    }

    #[test]
    fn test_is_domain_violation() {
        assert!(ContractError::violation(rules::UNIQUE_ID, "D1").is_domain_violation());
        assert!(!ContractError::not_found("D1").is_domain_violation());
    }
}
