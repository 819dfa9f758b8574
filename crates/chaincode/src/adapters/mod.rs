//! # Adapters Layer (Outer Hexagon)
//!
//! Concrete implementations of the outbound ports. Only the in-memory state
//! store lives here; in production the hosting platform supplies the store
//! behind the same [`crate::ports::outbound::StateStore`] contract.

pub mod state_adapter;

pub use state_adapter::*;
