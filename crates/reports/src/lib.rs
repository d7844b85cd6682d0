//! Reports module: read-side views derived from the movement history.
//!
//! Everything here is a pure function of an entity snapshot; nothing is stored.

pub mod balance;

pub use balance::{BalanceReport, compute_balance};
