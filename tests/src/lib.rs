//! # Hemoledger Test Suite
//!
//! End-to-end flows exercising the ledger through its public API and the
//! string-argument invocation boundary, backed by the in-memory state
//! store adapter.

pub mod integration;
