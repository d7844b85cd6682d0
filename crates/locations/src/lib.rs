//! Locations domain module.
//!
//! Storage locations stock can sit in. Pure domain logic (no IO, no HTTP, no storage).

pub mod location;

pub use location::{CreateLocation, EditLocation, Location};
