//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions between the domain and the outside world.
//!
//! - **Driving port (inbound)**: [`inbound::BloodLedgerApi`]
//! - **Driven port (outbound)**: [`outbound::StateStore`]
//!
//! No concrete implementations live here.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
