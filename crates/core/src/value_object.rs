//! Value objects: equality by value, not identity.
//!
//! Two value objects with the same values are the same value. They are validated
//! on construction and immutable afterwards, so holding one is proof the value is
//! acceptable to the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Marker trait for value objects.
///
/// The trait requires:
/// - **Clone**: values are cheap to copy
/// - **PartialEq**: compared by attribute values
/// - **Debug**: debuggable in logs and tests
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// Maximum display-name length (matches the storage column width).
pub const MAX_NAME_LEN: usize = 100;

/// Largest quantity a single movement may carry (the storage column is a plain
/// SQL integer).
pub const MAX_QUANTITY: i64 = i32::MAX as i64;

/// Non-empty, trimmed display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::validation(format!(
                "name cannot exceed {MAX_NAME_LEN} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Name {}

impl core::fmt::Display for Name {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Name {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Name> for String {
    fn from(value: Name) -> Self {
        value.0
    }
}

/// Normalize optional free text: blank text is treated as absent.
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Quantity of units carried by one movement.
///
/// Direction comes from which locations a movement names. New input must be
/// positive (`new` / `parse`); values loaded from storage keep whatever sign
/// older writers stored (`from_stored`). Balances are computed in `i64`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(i64);

impl Quantity {
    pub fn new(value: i64) -> DomainResult<Self> {
        if value <= 0 {
            return Err(DomainError::invalid_quantity(format!(
                "quantity must be positive (got {value})"
            )));
        }
        if value > MAX_QUANTITY {
            return Err(DomainError::invalid_quantity(format!(
                "quantity cannot exceed {MAX_QUANTITY} (got {value})"
            )));
        }
        Ok(Self(value))
    }

    /// Parse a quantity from text input (e.g. a form field).
    pub fn parse(input: &str) -> DomainResult<Self> {
        let trimmed = input.trim();
        let value = trimmed.parse::<i64>().map_err(|_| {
            DomainError::invalid_quantity(format!("'{trimmed}' is not a whole number"))
        })?;
        Self::new(value)
    }

    /// Wrap a previously stored quantity without the create-time checks.
    ///
    /// Only `i64::MIN` is refused, since its negation is not representable.
    pub fn from_stored(value: i64) -> DomainResult<Self> {
        if value == i64::MIN {
            return Err(DomainError::invalid_quantity(format!(
                "stored quantity {value} is out of range"
            )));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl ValueObject for Quantity {}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i64 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl FromStr for Quantity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn quantity_rejects_zero_and_negative() {
        assert!(matches!(Quantity::new(0), Err(DomainError::InvalidQuantity(_))));
        assert!(matches!(Quantity::new(-3), Err(DomainError::InvalidQuantity(_))));
        assert_eq!(Quantity::new(7).unwrap().get(), 7);
    }

    #[test]
    fn quantity_rejects_values_beyond_column_width() {
        assert!(Quantity::new(MAX_QUANTITY).is_ok());
        assert!(matches!(
            Quantity::new(MAX_QUANTITY + 1),
            Err(DomainError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn stored_quantities_keep_their_sign() {
        assert_eq!(Quantity::from_stored(0).unwrap().get(), 0);
        assert_eq!(Quantity::from_stored(-3).unwrap().get(), -3);
        assert!(Quantity::from_stored(i64::MIN).is_err());
    }

    #[test]
    fn quantity_parse_rejects_non_numeric_text() {
        assert!(matches!(Quantity::parse("ten"), Err(DomainError::InvalidQuantity(_))));
        assert!(matches!(Quantity::parse("2.5"), Err(DomainError::InvalidQuantity(_))));
        assert_eq!(Quantity::parse(" 12 ").unwrap().get(), 12);
    }

    #[test]
    fn name_is_trimmed_and_required() {
        assert_eq!(Name::new("  Widget ").unwrap().as_str(), "Widget");
        assert!(matches!(Name::new(""), Err(DomainError::Validation(_))));
        assert!(Name::new("n".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn blank_text_normalizes_to_none() {
        assert_eq!(normalize_text(Some("  ".to_string())), None);
        assert_eq!(normalize_text(Some("x".to_string())), Some("x".to_string()));
        assert_eq!(normalize_text(None), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: every positive in-range value is accepted and preserved.
        #[test]
        fn positive_quantities_roundtrip(v in 1i64..=MAX_QUANTITY) {
            let q = Quantity::new(v).unwrap();
            prop_assert_eq!(q.get(), v);
            prop_assert_eq!(Quantity::parse(&v.to_string()).unwrap(), q);
        }

        /// Property: no non-positive value ever becomes a quantity.
        #[test]
        fn non_positive_quantities_rejected(v in i64::MIN..=0i64) {
            prop_assert!(Quantity::new(v).is_err());
        }
    }
}
