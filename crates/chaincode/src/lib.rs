//! # Hemoledger Chaincode - Blood-Donation Inventory Ledger
//!
//! Domain CRUD logic for tracking blood donations on a permissioned ledger:
//! register donors and acceptors, record donations, apply laboratory
//! results, consume inventory, and query history. The hosting platform
//! supplies state storage, transaction ordering, and atomic commit; this
//! crate is the logic invoked inside that boundary.
//!
//! ## Unit Lifecycle
//!
//! | Status | Meaning | Next |
//! |--------|---------|------|
//! | `Collected` | donated, untested | `Tested`, `Unsafe` |
//! | `Tested` | safe for transfusion | `Partially Used`, `Used` |
//! | `Partially Used` | some quantity remains | `Partially Used`, `Used` |
//! | `Used` | fully consumed | terminal |
//! | `Unsafe` | failed testing | terminal |
//!
//! ## Architecture
//!
//! Hexagonal: `domain/` is pure logic, `ports/` holds the inbound API trait
//! and the outbound [`ports::outbound::StateStore`] trait, `adapters/`
//! provides an in-memory store for tests and local runs, `service.rs`
//! implements the API, and `invocation.rs` is the string-argument dispatch
//! boundary the host calls through.
//!
//! Every operation is one unit of work: read, validate, stage writes into a
//! [`ports::outbound::WriteBatch`], apply once. Either the whole write set
//! commits or none of it does.
//!
//! ## Usage Example
//!
//! ```ignore
//! use hemoledger_chaincode::prelude::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryStateStore::new());
//! let ledger = BloodLedgerService::new(store, ServiceConfig::default());
//!
//! let ctx = InvocationContext::new();
//! ledger.register_donor(&ctx, "D1", "Alice", "O+").await?;
//! ledger.record_donation(&ctx, "U1", "D1", "O+", 2, "City Hospital", None).await?;
//! ledger.test_blood(&ctx, "U1", TestResult::new("Safe")).await?;
//! ledger.accept_blood(&ctx, "U1", "A1", 1).await?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod invocation;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        Acceptor, BloodUnit, Document, Donor, InvocationContext, UsageHistory,
    };

    // Value objects
    pub use crate::domain::value_objects::{history_key, DocType, TestResult, UnitStatus};

    // Invariants
    pub use crate::domain::invariants::{can_transition, check_acceptance, AcceptanceViolation};

    // Ports
    pub use crate::ports::inbound::BloodLedgerApi;
    pub use crate::ports::outbound::{Selector, StateStore, WriteBatch};

    // Errors
    pub use crate::errors::{rules, ContractError, StoreError};

    // Adapters
    pub use crate::adapters::InMemoryStateStore;

    // Service
    pub use crate::service::{BloodLedgerService, ServiceConfig, ServiceStats};

    // Invocation boundary
    pub use crate::invocation::{dispatch, InvokeRequest};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================
