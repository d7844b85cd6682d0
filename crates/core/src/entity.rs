//! Entity trait: identity + continuity across state changes.

use crate::error::EntityKind;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Ord + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Which record type this is (used when reporting key errors).
    const KIND: EntityKind;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
