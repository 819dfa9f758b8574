//! # Domain Layer (Inner Hexagon)
//!
//! Pure domain logic for the blood-donation inventory ledger.
//! NO I/O, NO async, NO store access.
//!
//! - `value_objects`: status enum, test result, document discriminator
//! - `entities`: the four persisted record shapes + invocation context
//! - `invariants`: the lifecycle machine and acceptance preconditions

pub mod entities;
pub mod invariants;
pub mod value_objects;

pub use entities::*;
pub use invariants::*;
pub use value_objects::*;
