//! Movements domain module.
//!
//! This crate contains the movement record (quantities of a product moving
//! between optional locations) and the ledger rules that turn a movement into
//! signed stock effects. Pure, deterministic domain logic (no IO, no HTTP, no storage).

pub mod ledger;
pub mod movement;

pub use ledger::{MovementKind, StockEffect};
pub use movement::{EditMovement, Movement, RecordMovement, parse_location};
