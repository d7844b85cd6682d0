//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are caller-chosen strings (e.g. `"SKU-001"`, `"WH-NORTH"`). They
//! are trimmed and length-checked once, at construction; after that an id value
//! is always valid.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Maximum identifier length (matches the storage column width).
pub const MAX_ID_LEN: usize = 50;

/// Identifier of a product.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

/// Identifier of a storage location.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationId(String);

/// Identifier of a movement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MovementId(String);

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Validate and wrap an identifier.
            pub fn new(value: impl Into<String>) -> DomainResult<Self> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation(format!("{} cannot be empty", $name)));
                }
                if trimmed.chars().count() > MAX_ID_LEN {
                    return Err(DomainError::validation(format!(
                        "{} cannot exceed {} characters",
                        $name, MAX_ID_LEN
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

impl_string_newtype!(ProductId, "product_id");
impl_string_newtype!(LocationId, "location_id");
impl_string_newtype!(MovementId, "movement_id");

impl MovementId {
    /// Generate a fresh movement identifier.
    ///
    /// Uses UUIDv7 (time-ordered) so generated ids sort by creation time. Prefer
    /// passing ids explicitly in tests for determinism.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }
}
