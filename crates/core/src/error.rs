//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Kind of record an error refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Product,
    Location,
    Movement,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Product => "product",
            EntityKind::Location => "location",
            EntityKind::Movement => "movement",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, key and reference checks). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A record with the same primary key already exists.
    #[error("{kind} '{id}' already exists")]
    DuplicateKey { kind: EntityKind, id: String },

    /// An edit targeted a record that does not exist.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: String },

    /// A foreign key did not resolve to an existing record.
    #[error("{kind} '{id}' does not exist")]
    InvalidReference { kind: EntityKind, id: String },

    /// A quantity was non-positive, out of range or not a number.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// A movement names neither a source nor a destination.
    #[error("invalid movement: {0}")]
    InvalidMovement(String),

    /// A value failed validation (e.g. empty name, oversized identifier).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    pub fn duplicate_key(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::DuplicateKey { kind, id: id.into() }
    }

    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound { kind, id: id.into() }
    }

    pub fn invalid_reference(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::InvalidReference { kind, id: id.into() }
    }

    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn invalid_movement(msg: impl Into<String>) -> Self {
        Self::InvalidMovement(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Stable machine-readable code, used by outer layers for error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::DuplicateKey { .. } => "duplicate_key",
            DomainError::NotFound { .. } => "not_found",
            DomainError::InvalidReference { .. } => "invalid_reference",
            DomainError::InvalidQuantity(_) => "invalid_quantity",
            DomainError::InvalidMovement(_) => "invalid_movement",
            DomainError::Validation(_) => "validation_error",
            DomainError::InvariantViolation(_) => "invariant_violation",
        }
    }
}
