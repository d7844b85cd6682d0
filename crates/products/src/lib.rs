//! Products domain module.
//!
//! This crate contains the product catalog record and its typed inputs,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;

pub use product::{CreateProduct, EditProduct, Product};
