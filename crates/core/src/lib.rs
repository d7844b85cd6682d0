//! `stockroom-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the error taxonomy, and validated value objects.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, EntityKind};
pub use id::{LocationId, MovementId, ProductId};
pub use value_object::{Name, Quantity, ValueObject};
